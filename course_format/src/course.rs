use std::io::Cursor;
use glam::IVec3;
use log::debug;
use shared::geom::{MinMax, VecMinMaxFromIterator};
use crate::{
	checksum,
	effect_pool::{EffectPool, SlotAssignment, EFFECT_SLOTS},
	error::{Error, Region, Result},
	hooks::CourseHooks,
	model::{header::HEADER_SIZE, Header, ObjectRecord, PlacedObject, Style, EFFECT_RECORD_SIZE, OBJECT_RECORD_SIZE},
	read_vec, Readable, Writable,
};

pub const OBJECT_TABLE_OFFSET: usize = HEADER_SIZE;
pub const OBJECT_TABLE_SIZE: usize = 0x14500;
pub const OBJECT_CAPACITY: usize = OBJECT_TABLE_SIZE / OBJECT_RECORD_SIZE;
pub const EFFECT_TABLE_OFFSET: usize = OBJECT_TABLE_OFFSET + OBJECT_TABLE_SIZE;
pub const EFFECT_TABLE_END: usize = EFFECT_TABLE_OFFSET + EFFECT_SLOTS * EFFECT_RECORD_SIZE;
pub const TRAILER_SIZE: usize = 0xB0;
/// Every saved course is exactly this long.
pub const COURSE_SIZE: usize = EFFECT_TABLE_END + TRAILER_SIZE;

/// A whole course: header attributes and placed objects in stored order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Course {
	pub header: Header,
	pub objects: Vec<PlacedObject>,
}

impl Course {
	/// Decodes a course blob. The stored checksum is not checked.
	pub fn load(data: &[u8], hooks: &mut impl CourseHooks) -> Result<Self> {
		if data.len() < EFFECT_TABLE_END {
			return Err(Error::Truncated { needed: EFFECT_TABLE_END, len: data.len() });
		}
		let mut reader = Cursor::new(data);
		let (header, num_items) = Header::read(&mut reader)?;
		if num_items > OBJECT_CAPACITY {
			return Err(Error::CapacityExceeded { region: Region::ObjectTable, count: num_items, capacity: OBJECT_CAPACITY });
		}
		reader.set_position(EFFECT_TABLE_OFFSET as u64);
		let effects = EffectPool::read(&mut reader)?;
		reader.set_position(OBJECT_TABLE_OFFSET as u64);
		let records: Vec<ObjectRecord> = read_vec(&mut reader, num_items)?;
		let objects = records.iter().map(|record| PlacedObject::from_record(record, &effects)).collect();
		let course = Course { header, objects };
		debug!("loaded course {:?}: {} objects", course.header.name, course.objects.len());
		hooks.style_changed(course.header.style);
		hooks.theme_changed(course.header.theme);
		for object in &course.objects {
			hooks.refresh_list_representation(object);
			hooks.refresh_dynamic_sizing(object);
		}
		Ok(course)
	}

	/// Encodes the course, compacting effects and recomputing the checksum.
	pub fn save(&self) -> Result<Vec<u8>> {
		if self.objects.len() > OBJECT_CAPACITY {
			return Err(Error::CapacityExceeded {
				region: Region::ObjectTable,
				count: self.objects.len(),
				capacity: OBJECT_CAPACITY,
			});
		}
		let SlotAssignment { pool, indices, distinct } = EffectPool::assign_slots(&self.objects)?;
		let mut data = Vec::with_capacity(COURSE_SIZE);
		self.header.write(&mut data, self.objects.len() as u32)?;
		for (object, &effect_index) in self.objects.iter().zip(&indices) {
			object.to_record(effect_index).write(&mut data)?;
		}
		data.resize(EFFECT_TABLE_OFFSET, 0);
		pool.write(&mut data)?;
		data.resize(COURSE_SIZE, 0);
		let crc = checksum::compute(&data);
		checksum::splice(&mut data, crc);
		debug!("saved course {:?}: {} objects, {} effects, checksum {:08x}", self.header.name, self.objects.len(), distinct, crc);
		Ok(data)
	}

	/// The only way to change the style that also notifies `hooks`.
	pub fn set_style(&mut self, style: Style, hooks: &mut impl CourseHooks) {
		self.header.style = style;
		hooks.style_changed(style);
	}

	/// The only way to change the theme that also notifies `hooks`.
	pub fn set_theme(&mut self, theme: u8, hooks: &mut impl CourseHooks) {
		self.header.theme = theme;
		hooks.theme_changed(theme);
	}

	/// Bounding box of all object positions.
	pub fn extent(&self) -> Option<MinMax<IVec3>> {
		self.objects.iter().map(|object| object.pos).min_max()
	}
}

#[cfg(test)]
mod tests {
	use glam::ivec3;
	use crate::{hooks::StyleContext, model::EffectRecord};
	use super::*;

	#[derive(Default)]
	struct Recorder {
		listed: Vec<IVec3>,
		sized: usize,
		styles: Vec<Style>,
	}

	impl CourseHooks for Recorder {
		fn style_changed(&mut self, style: Style) {
			self.styles.push(style);
		}

		fn refresh_list_representation(&mut self, object: &PlacedObject) {
			self.listed.push(object.pos);
		}

		fn refresh_dynamic_sizing(&mut self, _: &PlacedObject) {
			self.sized += 1;
		}
	}

	fn object_at(x: i32, y: i32) -> PlacedObject {
		PlacedObject { pos: ivec3(x, y, 0), width: 1, height: 1, ..PlacedObject::default() }
	}

	#[test]
	fn layout_constants() {
		assert_eq!(OBJECT_CAPACITY, 2600);
		assert_eq!(EFFECT_TABLE_OFFSET, 0x145F0);
		assert_eq!(COURSE_SIZE, 0x15000);
	}

	#[test]
	fn empty_course_has_fixed_size() {
		let data = Course::default().save().unwrap();
		assert_eq!(data.len(), COURSE_SIZE);
		assert!(data[OBJECT_TABLE_OFFSET..EFFECT_TABLE_OFFSET].iter().all(|&b| b == 0));
		assert!(data[EFFECT_TABLE_END..].iter().all(|&b| b == 0));
	}

	#[test]
	fn hooks_run_once_per_object() {
		let course = Course {
			header: Header { style: Style::SuperMarioBros3, ..Header::default() },
			objects: vec![object_at(0, 0), object_at(16, 32)],
		};
		let data = course.save().unwrap();
		let mut recorder = Recorder::default();
		Course::load(&data, &mut recorder).unwrap();
		assert_eq!(recorder.listed, [ivec3(0, 0, 0), ivec3(16, 32, 0)]);
		assert_eq!(recorder.sized, 2);
		assert_eq!(recorder.styles, [Style::SuperMarioBros3]);
	}

	#[test]
	fn setters_notify_context() {
		let mut context = StyleContext::default();
		let mut course = Course::default();
		course.set_style(Style::SuperMarioWorld, &mut context);
		course.set_theme(4, &mut context);
		assert_eq!(context, StyleContext { style: Style::SuperMarioWorld, theme: 4 });
		assert_eq!(course.header.theme, 4);
		course.header.style = Style::SuperMarioBros3;
		assert_eq!(context.style, Style::SuperMarioWorld);
	}

	#[test]
	fn effects_written_after_objects() {
		let mut object = object_at(0, 0);
		object.effect = Some(EffectRecord([1, 2, 3, 4, 5]));
		let course = Course { objects: vec![object_at(16, 0), object], ..Course::default() };
		let data = course.save().unwrap();
		let second = OBJECT_TABLE_OFFSET + OBJECT_RECORD_SIZE;
		assert_eq!(data[OBJECT_TABLE_OFFSET + 28..OBJECT_TABLE_OFFSET + 30], (-1i16).to_be_bytes());
		assert_eq!(data[second + 28..second + 30], 0i16.to_be_bytes());
		assert_eq!(data[EFFECT_TABLE_OFFSET..EFFECT_TABLE_OFFSET + 8], [1, 2, 3, 4, 5, 0, 0, 0]);
	}

	#[test]
	fn too_many_objects() {
		let course = Course { objects: vec![PlacedObject::default(); OBJECT_CAPACITY + 1], ..Course::default() };
		assert!(matches!(course.save(), Err(Error::CapacityExceeded { region: Region::ObjectTable, .. })));
	}

	#[test]
	fn declared_count_beyond_capacity() {
		let mut data = Course::default().save().unwrap();
		data[0xEC..0xF0].copy_from_slice(&(OBJECT_CAPACITY as u32 + 1).to_be_bytes());
		assert!(matches!(Course::load(&data, &mut ()), Err(Error::CapacityExceeded { .. })));
	}

	#[test]
	fn extent_spans_objects() {
		let course = Course { objects: vec![object_at(-16, 48), object_at(32, 0)], ..Course::default() };
		let extent = course.extent().unwrap();
		assert_eq!(extent.min, ivec3(-16, 0, 0));
		assert_eq!(extent.max, ivec3(32, 48, 0));
		assert!(Course::default().extent().is_none());
	}
}
