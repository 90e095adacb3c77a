extern crate self as course_format;

pub mod model;
pub mod effect_pool;
pub mod checksum;
pub mod course;
pub mod terrain;
pub mod hooks;
mod error;
pub(crate) mod impls;

use std::io::{Read, Result, Write};
pub use course_derive::{Readable, Writable};
pub use course::Course;
pub use error::{Error, Region};
pub use hooks::{CourseHooks, StyleContext};
pub use model::{EffectRecord, PlacedObject, Style};

/// A fixed-layout big-endian value that can be pulled off a byte stream.
pub trait Readable: Sized {
	fn read<R: Read>(reader: &mut R) -> Result<Self>;
}

/// Inverse of `Readable`.
pub trait Writable {
	fn write<W: Write>(&self, writer: &mut W) -> Result<()>;
}

pub fn skip<R: Read>(reader: &mut R, num: usize) -> Result<()> {
	let mut buf = [0];
	for _ in 0..num {
		reader.read_exact(&mut buf)?;
	}
	Ok(())
}

pub fn pad<W: Write>(writer: &mut W, num: usize) -> Result<()> {
	for _ in 0..num {
		writer.write_all(&[0])?;
	}
	Ok(())
}

pub(crate) fn read_vec<R: Read, T: Readable>(reader: &mut R, len: usize) -> Result<Vec<T>> {
	let mut vec = Vec::with_capacity(len);
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec)
}
