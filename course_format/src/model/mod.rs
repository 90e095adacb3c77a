pub mod header;

use glam::{ivec3, IVec3};
use num_traits::AsPrimitive;
use crate::{effect_pool::EffectPool, Readable, Writable};
pub use header::{Header, Style};

/// Stored positions are in tenths of a unit.
pub const POSITION_SCALE: i64 = 10;
/// Stored x and y are shifted by half a tile.
pub const TILE_OFFSET: i64 = 8;
pub const OBJECT_RECORD_SIZE: usize = 32;
pub const EFFECT_RECORD_SIZE: usize = 8;
/// Stored effect index meaning "no effect".
pub const NO_EFFECT: i16 = -1;

/// Shared five-byte parameter block. Records are interchangeable when their
/// bytes match.
#[derive(Readable, Writable, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EffectRecord(#[skip_after(3)] pub [i8; 5]);

impl EffectRecord {
	/// Fills effect slots nothing refers to.
	pub const DEFAULT: EffectRecord = EffectRecord([0; 5]);
}

/// On-disk object record.
#[derive(Readable, Writable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
	pub x: u32,
	pub z: u32,
	pub y: i16,
	pub width: i8,
	pub height: i8,
	pub data_head: [u8; 4],
	pub data_sub: [u8; 4],
	pub data_tail: [u8; 4],
	pub kind: i8,
	pub kind_sub: i8,
	pub linking_id: i16,
	/// Index into the effect table, `NO_EFFECT` for none
	pub effect_index: i16,
	pub costume: i8,
	pub costume_sub: i8,
}

fn unscale<T: AsPrimitive<i64>>(stored: T, offset: i64) -> i32 {
	(stored.as_().div_euclid(POSITION_SCALE) - offset) as i32
}

fn scale<T: Copy + 'static>(pos: i32, offset: i64) -> T where i64: AsPrimitive<T> {
	((pos as i64 + offset) * POSITION_SCALE).as_()
}

/// One placed element of a course.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacedObject {
	/// Units of 1/16 tile, x right, y up, z depth
	pub pos: IVec3,
	pub width: i8,
	pub height: i8,
	/// Object parameters; byte 7 holds the edge tile of ground objects
	pub data: [u8; 8],
	/// Stored between the two halves of `data`
	pub data_sub: [u8; 4],
	pub kind: i8,
	pub kind_sub: i8,
	pub linking_id: i16,
	pub effect: Option<EffectRecord>,
	pub costume: i8,
	pub costume_sub: i8,
}

impl PlacedObject {
	pub fn from_record(record: &ObjectRecord, effects: &EffectPool) -> Self {
		let mut data = [0; 8];
		data[..4].copy_from_slice(&record.data_head);
		data[4..].copy_from_slice(&record.data_tail);
		PlacedObject {
			pos: ivec3(
				unscale(record.x, TILE_OFFSET),
				unscale(record.y, TILE_OFFSET),
				unscale(record.z, 0),
			),
			width: record.width,
			height: record.height,
			data,
			data_sub: record.data_sub,
			kind: record.kind,
			kind_sub: record.kind_sub,
			linking_id: record.linking_id,
			effect: effects.resolve(record.effect_index),
			costume: record.costume,
			costume_sub: record.costume_sub,
		}
	}

	/// `effect_index` is the slot assigned to `self.effect` for this save.
	pub fn to_record(&self, effect_index: i16) -> ObjectRecord {
		let [h0, h1, h2, h3, t0, t1, t2, t3] = self.data;
		ObjectRecord {
			x: scale(self.pos.x, TILE_OFFSET),
			z: scale(self.pos.z, 0),
			y: scale(self.pos.y, TILE_OFFSET),
			width: self.width,
			height: self.height,
			data_head: [h0, h1, h2, h3],
			data_sub: self.data_sub,
			data_tail: [t0, t1, t2, t3],
			kind: self.kind,
			kind_sub: self.kind_sub,
			linking_id: self.linking_id,
			effect_index,
			costume: self.costume,
			costume_sub: self.costume_sub,
		}
	}
}
