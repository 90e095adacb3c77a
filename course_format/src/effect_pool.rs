use std::{collections::HashMap, io::{Read, Result as IoResult, Write}};
use arrayvec::ArrayVec;
use log::{debug, warn};
use crate::{
	error::{Error, Region, Result}, model::{EffectRecord, PlacedObject, NO_EFFECT}, read_vec, Readable, Writable,
};

/// Number of slots in the on-disk effect table.
pub const EFFECT_SLOTS: usize = 300;

/// The effect table: always exactly `EFFECT_SLOTS` records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectPool {
	slots: ArrayVec<EffectRecord, EFFECT_SLOTS>,
}

/// Result of compacting the effects referenced by a list of objects.
#[derive(Clone, Debug)]
pub struct SlotAssignment {
	pub pool: EffectPool,
	/// Stored effect index per object, in object order
	pub indices: Vec<i16>,
	/// Number of leading slots holding referenced records
	pub distinct: usize,
}

impl Default for EffectPool {
	fn default() -> Self {
		let mut slots = ArrayVec::new();
		slots.extend((0..EFFECT_SLOTS).map(|_| EffectRecord::DEFAULT));
		Self { slots }
	}
}

impl EffectPool {
	pub fn slots(&self) -> &[EffectRecord] {
		&self.slots
	}

	/// `NO_EFFECT` resolves to `None`; any other index wraps around the table.
	pub fn resolve(&self, index: i16) -> Option<EffectRecord> {
		if index == NO_EFFECT {
			return None;
		}
		let slot = index.rem_euclid(EFFECT_SLOTS as i16) as usize;
		if slot != index as usize {
			warn!("effect index {} out of range, using slot {}", index, slot);
		}
		self.slots.get(slot).copied()
	}

	/// Gives every distinct referenced record a slot, in first-use order.
	/// Unused slots are filled with `EffectRecord::DEFAULT`.
	pub fn assign_slots<'a, I>(objects: I) -> Result<SlotAssignment>
	where
		I: IntoIterator<Item = &'a PlacedObject>,
	{
		let mut order = vec![];
		let mut lookup = HashMap::new();
		let mut slot_of = vec![];
		for object in objects {
			slot_of.push(object.effect.map(|effect| {
				*lookup.entry(effect).or_insert_with(|| {
					order.push(effect);
					order.len() - 1
				})
			}));
		}
		let distinct = order.len();
		if distinct > EFFECT_SLOTS {
			return Err(Error::CapacityExceeded { region: Region::EffectTable, count: distinct, capacity: EFFECT_SLOTS });
		}
		debug!("{} distinct effects referenced by {} objects", distinct, slot_of.len());
		let mut slots: ArrayVec<EffectRecord, EFFECT_SLOTS> = order.into_iter().collect();
		while !slots.is_full() {
			slots.push(EffectRecord::DEFAULT);
		}
		let indices = slot_of.into_iter().map(|slot| slot.map_or(NO_EFFECT, |slot| slot as i16)).collect();
		Ok(SlotAssignment { pool: EffectPool { slots }, indices, distinct })
	}
}

impl Readable for EffectPool {
	fn read<R: Read>(reader: &mut R) -> IoResult<Self> {
		let slots = read_vec::<_, EffectRecord>(reader, EFFECT_SLOTS)?.into_iter().collect();
		Ok(Self { slots })
	}
}

impl Writable for EffectPool {
	fn write<W: Write>(&self, writer: &mut W) -> IoResult<()> {
		for slot in &self.slots {
			slot.write(writer)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_effect(effect: Option<[i8; 5]>) -> PlacedObject {
		PlacedObject { effect: effect.map(EffectRecord), ..PlacedObject::default() }
	}

	fn distinct_effect(n: usize) -> [i8; 5] {
		[(n & 0x7F) as i8, (n >> 7) as i8, 1, 2, 3]
	}

	#[test]
	fn identical_records_share_a_slot() {
		let objects = [
			with_effect(Some([1, 2, 3, 4, 5])),
			with_effect(None),
			with_effect(Some([5, 4, 3, 2, 1])),
			with_effect(Some([1, 2, 3, 4, 5])),
		];
		let assignment = EffectPool::assign_slots(&objects).unwrap();
		assert_eq!(assignment.indices, [0, NO_EFFECT, 1, 0]);
		assert_eq!(assignment.distinct, 2);
		assert_eq!(assignment.pool.slots()[1], EffectRecord([5, 4, 3, 2, 1]));
	}

	#[test]
	fn unused_slots_are_default() {
		let objects = [with_effect(Some([7; 5]))];
		let assignment = EffectPool::assign_slots(&objects).unwrap();
		let slots = assignment.pool.slots();
		assert_eq!(slots.len(), EFFECT_SLOTS);
		assert!(slots[1..].iter().all(|slot| *slot == EffectRecord::DEFAULT));
	}

	#[test]
	fn exactly_full_table_is_accepted() {
		let objects: Vec<_> = (0..EFFECT_SLOTS).map(|n| with_effect(Some(distinct_effect(n)))).collect();
		let assignment = EffectPool::assign_slots(&objects).unwrap();
		assert_eq!(assignment.distinct, EFFECT_SLOTS);
		assert_eq!(assignment.indices[EFFECT_SLOTS - 1], (EFFECT_SLOTS - 1) as i16);
	}

	#[test]
	fn too_many_distinct_records_fail() {
		let objects: Vec<_> = (0..=EFFECT_SLOTS).map(|n| with_effect(Some(distinct_effect(n)))).collect();
		match EffectPool::assign_slots(&objects) {
			Err(Error::CapacityExceeded { region, capacity, .. }) => {
				assert_eq!(region, Region::EffectTable);
				assert_eq!(capacity, EFFECT_SLOTS);
			},
			other => panic!("expected capacity error, got {:?}", other),
		}
	}

	#[test]
	fn resolve_wraps_out_of_range_indices() {
		let objects = [with_effect(Some([1; 5])), with_effect(Some([2; 5]))];
		let pool = EffectPool::assign_slots(&objects).unwrap().pool;
		assert_eq!(pool.resolve(NO_EFFECT), None);
		assert_eq!(pool.resolve(1), Some(EffectRecord([2; 5])));
		assert_eq!(pool.resolve(301), Some(EffectRecord([2; 5])));
		assert_eq!(pool.resolve(-300), Some(EffectRecord([1; 5])));
		assert_eq!(pool.resolve(-2), Some(EffectRecord::DEFAULT));
	}
}
