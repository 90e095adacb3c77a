//! Edge tile selection for ground objects.
//!
//! A ground tile picks its visual edge variant from which of its eight
//! neighbour cells hold another ground tile. Cells beyond the level border
//! count as filled, so ground running into the border has no visible edge
//! there.

use bitfield::bitfield;
use glam::{ivec2, IVec2};
use log::trace;
use shared::geom::{MinMax, VecMinMax};
use crate::{hooks::CourseHooks, model::PlacedObject};

/// Type code of ground objects.
pub const GROUND_KIND: i8 = 7;
/// Position units per tile.
pub const TILE_SIZE: i32 = 16;
/// Byte of `PlacedObject::data` holding the edge tile index.
pub const EDGE_TILE_BYTE: usize = 7;

bitfield! {
	/// Occupied neighbour cells.
	#[derive(Clone, Copy, Default, PartialEq, Eq)]
	pub struct AdjacencyMask(u8);
	impl Debug;
	pub south_east, set_south_east: 0;
	pub south, set_south: 1;
	pub south_west, set_south_west: 2;
	pub east, set_east: 3;
	pub west, set_west: 4;
	pub north_east, set_north_east: 5;
	pub north, set_north: 6;
	pub north_west, set_north_west: 7;
}

impl AdjacencyMask {
	pub const LEFT_BORDER: u8 = 0x94;
	pub const RIGHT_BORDER: u8 = 0x29;
	pub const BOTTOM_BORDER: u8 = 0x07;
	pub const TOP_BORDER: u8 = 0xE0;

	pub fn bits(self) -> u8 {
		self.0
	}

	pub fn edge_tile(self) -> u8 {
		TERRAIN_EDGES[self.0 as usize]
	}
}

/// Edge tile index for every adjacency mask.
pub const TERRAIN_EDGES: [u8; 256] = [
	24, 24, 28, 28, 24, 24, 28, 28, 25, 25, 34, 0, 25, 25, 34, 0,
	27, 27, 33, 33, 27, 27, 1, 1, 6, 6, 36, 44, 6, 6, 45, 9,
	24, 24, 28, 28, 24, 24, 28, 28, 25, 25, 34, 0, 25, 25, 34, 0,
	27, 27, 33, 33, 27, 27, 1, 1, 6, 6, 36, 44, 6, 6, 45, 9,
	30, 30, 29, 29, 30, 30, 29, 29, 32, 32, 38, 40, 32, 32, 38, 40,
	31, 31, 37, 37, 31, 31, 41, 41, 35, 35, 39, 48, 49, 35, 49, 52,
	30, 30, 29, 29, 30, 30, 29, 29, 4, 4, 42, 2, 4, 4, 42, 2,
	31, 31, 37, 37, 31, 31, 41, 41, 46, 46, 50, 54, 46, 46, 57, 67,
	24, 24, 28, 28, 24, 24, 28, 28, 25, 25, 34, 0, 25, 25, 34, 0,
	27, 27, 33, 33, 27, 27, 1, 1, 6, 6, 36, 44, 6, 6, 45, 9,
	24, 24, 28, 28, 24, 24, 28, 28, 25, 25, 34, 0, 25, 25, 34, 0,
	27, 27, 33, 33, 27, 27, 1, 1, 6, 6, 36, 44, 6, 6, 45, 9,
	30, 30, 29, 29, 30, 30, 29, 29, 32, 32, 38, 40, 32, 32, 38, 40,
	5, 5, 43, 43, 5, 5, 3, 3, 47, 47, 51, 56, 47, 47, 55, 68,
	30, 30, 29, 29, 30, 30, 29, 29, 4, 4, 42, 2, 4, 4, 42, 2,
	5, 5, 43, 43, 5, 5, 3, 3, 15, 15, 53, 69, 15, 15, 70, 12,
];

/// Playable area, in tiles, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelBounds(pub MinMax<IVec2>);

impl Default for LevelBounds {
	fn default() -> Self {
		Self(MinMax { min: ivec2(0, 0), max: ivec2(239, 26) })
	}
}

impl LevelBounds {
	fn min(&self) -> IVec2 {
		self.0.min * TILE_SIZE
	}

	fn max(&self) -> IVec2 {
		self.0.max * TILE_SIZE
	}

	pub fn contains(&self, pos: IVec2) -> bool {
		MinMax { min: self.min(), max: self.max() }.contains_point(pos)
	}

	/// Neighbour cells that fall on or past the border. At most one side per
	/// axis applies, the minimum side first.
	pub fn border_mask(&self, pos: IVec2) -> u8 {
		let (min, max) = (self.min(), self.max());
		let mut mask = 0;
		if pos.x <= min.x {
			mask |= AdjacencyMask::LEFT_BORDER;
		} else if pos.x >= max.x {
			mask |= AdjacencyMask::RIGHT_BORDER;
		}
		if pos.y <= min.y {
			mask |= AdjacencyMask::BOTTOM_BORDER;
		} else if pos.y >= max.y {
			mask |= AdjacencyMask::TOP_BORDER;
		}
		mask
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
	Before,
	Aligned,
	After,
}

/// Where `other` lies relative to `this` on one axis, within one tile.
fn classify(this: i32, other: i32) -> Option<Side> {
	if this - TILE_SIZE <= other && other < this {
		Some(Side::Before)
	} else if other == this {
		Some(Side::Aligned)
	} else if this < other && other <= this + TILE_SIZE {
		Some(Side::After)
	} else {
		None
	}
}

/// Neighbour mask of a tile at `pos` given every ground position. A position
/// equal to `pos` sets nothing.
pub fn adjacency(pos: IVec2, ground: &[IVec2]) -> AdjacencyMask {
	let mut mask = AdjacencyMask::default();
	for &other in ground {
		let (Some(horizontal), Some(vertical)) = (classify(pos.x, other.x), classify(pos.y, other.y)) else {
			continue;
		};
		match (horizontal, vertical) {
			(Side::Before, Side::After) => mask.set_north_west(true),
			(Side::Aligned, Side::After) => mask.set_north(true),
			(Side::After, Side::After) => mask.set_north_east(true),
			(Side::Before, Side::Aligned) => mask.set_west(true),
			(Side::After, Side::Aligned) => mask.set_east(true),
			(Side::Before, Side::Before) => mask.set_south_west(true),
			(Side::Aligned, Side::Before) => mask.set_south(true),
			(Side::After, Side::Before) => mask.set_south_east(true),
			(Side::Aligned, Side::Aligned) => {},
		}
	}
	mask
}

/// Recomputes the edge tile of each candidate ground object. Neighbours are
/// taken from every ground object in `objects`, not just the candidates.
/// Candidates that are out of range or not ground are skipped. Returns the
/// number of objects updated.
pub fn regenerate_ground<I>(
	objects: &mut [PlacedObject], candidates: I, bounds: &LevelBounds, hooks: &mut impl CourseHooks,
) -> usize
where
	I: IntoIterator<Item = usize>,
{
	let ground: Vec<IVec2> = objects
		.iter()
		.filter(|object| object.kind == GROUND_KIND)
		.map(|object| object.pos.truncate())
		.collect();
	let mut updated = 0;
	for index in candidates {
		let Some(object) = objects.get_mut(index) else {
			continue;
		};
		if object.kind != GROUND_KIND {
			continue;
		}
		let pos = object.pos.truncate();
		let mask = AdjacencyMask(adjacency(pos, &ground).bits() | bounds.border_mask(pos));
		object.data[EDGE_TILE_BYTE] = mask.edge_tile();
		trace!("ground at {} mask {:08b} edge {}", pos, mask.bits(), mask.edge_tile());
		hooks.refresh_dynamic_sizing(object);
		hooks.refresh_list_representation(object);
		updated += 1;
	}
	updated
}

/// `regenerate_ground` over every object.
pub fn regenerate_all_ground(objects: &mut [PlacedObject], bounds: &LevelBounds, hooks: &mut impl CourseHooks) -> usize {
	let len = objects.len();
	regenerate_ground(objects, 0..len, bounds, hooks)
}

#[cfg(test)]
mod tests {
	use glam::ivec3;
	use super::*;

	const MID: IVec2 = IVec2::new(64, 64);

	fn ground(x: i32, y: i32) -> PlacedObject {
		PlacedObject { pos: ivec3(x, y, 0), kind: GROUND_KIND, data: [0xAA; 8], ..PlacedObject::default() }
	}

	#[derive(Default)]
	struct Counter(usize, usize);

	impl CourseHooks for Counter {
		fn refresh_list_representation(&mut self, _: &PlacedObject) {
			self.0 += 1;
		}

		fn refresh_dynamic_sizing(&mut self, _: &PlacedObject) {
			self.1 += 1;
		}
	}

	#[test]
	fn isolated_tile() {
		let mut objects = [ground(MID.x, MID.y), ground(MID.x + 48, MID.y)];
		regenerate_ground(&mut objects, [0], &LevelBounds::default(), &mut ());
		assert_eq!(objects[0].data[EDGE_TILE_BYTE], TERRAIN_EDGES[0]);
		assert_eq!(objects[0].data[..EDGE_TILE_BYTE], [0xAA; 7]);
		assert_eq!(objects[1].data[EDGE_TILE_BYTE], 0xAA);
	}

	#[test]
	fn surrounded_tile() {
		let mut objects = vec![];
		for dy in [-16, 0, 16] {
			for dx in [-16, 0, 16] {
				objects.push(ground(MID.x + dx, MID.y + dy));
			}
		}
		let pos: Vec<IVec2> = objects.iter().map(|o| o.pos.truncate()).collect();
		assert_eq!(adjacency(MID, &pos).bits(), 0xFF);
		regenerate_ground(&mut objects, [4], &LevelBounds::default(), &mut ());
		assert_eq!(objects[4].data[EDGE_TILE_BYTE], TERRAIN_EDGES[255]);
	}

	#[test]
	fn compass_bits() {
		let mask = adjacency(MID, &[MID + ivec2(-16, 16), MID + ivec2(16, 0), MID + ivec2(0, -8)]);
		assert!(mask.north_west());
		assert!(mask.east());
		assert!(mask.south());
		assert_eq!(mask.bits(), 0x80 | 0x08 | 0x02);
	}

	#[test]
	fn window_is_one_tile() {
		assert_eq!(adjacency(MID, &[MID + ivec2(17, 0), MID + ivec2(0, -17)]).bits(), 0);
		assert_eq!(adjacency(MID, &[MID + ivec2(16, 0), MID + ivec2(-16, 0)]).bits(), 0x08 | 0x10);
	}

	#[test]
	fn left_border_counts_as_ground() {
		let mut objects = [ground(0, MID.y)];
		regenerate_all_ground(&mut objects, &LevelBounds::default(), &mut ());
		assert_eq!(objects[0].data[EDGE_TILE_BYTE], TERRAIN_EDGES[AdjacencyMask::LEFT_BORDER as usize]);
	}

	#[test]
	fn corner_combines_both_axes() {
		let bounds = LevelBounds::default();
		assert_eq!(bounds.border_mask(ivec2(0, 0)), 0x94 | 0x07);
		assert_eq!(bounds.border_mask(ivec2(239 * 16, 26 * 16)), 0x29 | 0xE0);
		assert_eq!(bounds.border_mask(MID), 0);
	}

	#[test]
	fn neighbours_come_from_all_ground() {
		let mut objects = [ground(MID.x, MID.y), ground(MID.x + 16, MID.y)];
		regenerate_ground(&mut objects, [0], &LevelBounds::default(), &mut ());
		assert_eq!(objects[0].data[EDGE_TILE_BYTE], TERRAIN_EDGES[0x08]);
	}

	#[test]
	fn non_ground_is_skipped() {
		let mut block = ground(MID.x + 16, MID.y);
		block.kind = 4;
		let mut objects = [ground(MID.x, MID.y), block];
		let mut counter = Counter::default();
		let updated = regenerate_ground(&mut objects, [0, 1, 9], &LevelBounds::default(), &mut counter);
		assert_eq!(updated, 1);
		assert_eq!((counter.0, counter.1), (1, 1));
		assert_eq!(objects[0].data[EDGE_TILE_BYTE], TERRAIN_EDGES[0]);
		assert_eq!(objects[1].data[EDGE_TILE_BYTE], 0xAA);
	}

	#[test]
	fn bounds_contain_tiles() {
		let bounds = LevelBounds::default();
		assert!(bounds.contains(MID));
		assert!(!bounds.contains(ivec2(-16, 0)));
	}
}
