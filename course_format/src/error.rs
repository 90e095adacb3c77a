use std::fmt;
use thiserror::Error;

/// Fixed-capacity region of the course blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
	ObjectTable,
	EffectTable,
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Region::ObjectTable => "object table",
			Region::EffectTable => "effect table",
		})
	}
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("unsupported course format version {found:#x}")]
	Format { found: u64 },
	#[error("course data truncated: need {needed:#x} bytes, got {len:#x}")]
	Truncated { needed: usize, len: usize },
	#[error("{region} holds at most {capacity} entries, course needs {count}")]
	CapacityExceeded { region: Region, count: usize, capacity: usize },
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
