use std::io::{Read, Write};
use log::warn;
use crate::{error::{Error, Result}, Readable, Writable};

pub const FORMAT_VERSION: u64 = 0x0B;
pub const HEADER_SIZE: usize = 0xF0;
pub const NAME_LEN: usize = 66;
/// Themes are folded into `0..THEME_COUNT` on load.
pub const THEME_COUNT: u8 = 6;

/// Game skin, stored as a two-letter ASCII tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
	#[default]
	SuperMarioBros,
	SuperMarioBros3,
	SuperMarioWorld,
	NewSuperMarioBrosU,
}

impl Style {
	pub const ALL: [Style; 4] = [
		Style::SuperMarioBros,
		Style::SuperMarioBros3,
		Style::SuperMarioWorld,
		Style::NewSuperMarioBrosU,
	];

	pub fn tag(self) -> [u8; 2] {
		match self {
			Style::SuperMarioBros => *b"M1",
			Style::SuperMarioBros3 => *b"M3",
			Style::SuperMarioWorld => *b"MW",
			Style::NewSuperMarioBrosU => *b"WU",
		}
	}

	pub fn from_tag(tag: [u8; 2]) -> Option<Self> {
		Self::ALL.into_iter().find(|style| style.tag() == tag)
	}

	pub fn index(self) -> u8 {
		self as u8
	}
}

/// On-disk header, field for field.
#[derive(Readable, Writable)]
pub(crate) struct HeaderRecord {
	version: u64,
	checksum: u32,
	#[skip(4)]
	creation_year: u16,
	creation_month: u8,
	creation_day: u8,
	creation_hour: u8,
	creation_minute: u8,
	unk16: u8,
	unk17: u8,
	unk18: u64,
	#[skip_after(7)]
	unk20: u8,
	name: [u8; NAME_LEN],
	style: [u8; 2],
	unk6c: u8,
	theme: u8,
	unk6e: u8,
	unk6f: u8,
	time_limit: u16,
	autoscroll: u8,
	unk73: u8,
	unk74: u32,
	unk78: [u8; 96],
	unkd8: u32,
	unkdc: u32,
	#[skip(12)]
	num_items: u32,
}

/// Course attributes. The `unk*` fields are named after their byte offset and
/// are carried through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
	pub creation_year: u16,
	pub creation_month: u8,
	pub creation_day: u8,
	pub creation_hour: u8,
	pub creation_minute: u8,
	pub unk16: u8,
	pub unk17: u8,
	pub unk18: u64,
	pub unk20: u8,
	pub name: String,
	/// Setting this directly does not notify `CourseHooks`; use `Course::set_style`.
	pub style: Style,
	pub unk6c: u8,
	/// Written back as-is; only reduced into range when read.
	/// Setting this directly does not notify `CourseHooks`; use `Course::set_theme`.
	pub theme: u8,
	pub unk6e: u8,
	pub unk6f: u8,
	pub time_limit: u16,
	pub autoscroll: u8,
	pub unk73: u8,
	pub unk74: u32,
	pub unk78: [u8; 96],
	pub unkd8: u32,
	pub unkdc: u32,
}

impl Default for Header {
	fn default() -> Self {
		Self {
			creation_year: 0,
			creation_month: 0,
			creation_day: 0,
			creation_hour: 0,
			creation_minute: 0,
			unk16: 0,
			unk17: 0,
			unk18: 0,
			unk20: 0,
			name: String::new(),
			style: Style::default(),
			unk6c: 0,
			theme: 0,
			unk6e: 0,
			unk6f: 0,
			time_limit: 0,
			autoscroll: 0,
			unk73: 0,
			unk74: 0,
			unk78: [0; 96],
			unkd8: 0,
			unkdc: 0,
		}
	}
}

/// UTF-16BE, trailing zero code units trimmed.
fn decode_name(raw: &[u8; NAME_LEN]) -> String {
	let mut units: Vec<u16> = raw.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
	while units.last() == Some(&0) {
		units.pop();
	}
	String::from_utf16_lossy(&units)
}

/// Cut at a `char` boundary so a surrogate pair is never split.
fn encode_name(name: &str) -> [u8; NAME_LEN] {
	let mut raw = [0; NAME_LEN];
	let mut at = 0;
	for c in name.chars() {
		let mut units = [0u16; 2];
		let units = c.encode_utf16(&mut units);
		if at + units.len() * 2 > NAME_LEN {
			break;
		}
		for unit in units.iter() {
			raw[at..at + 2].copy_from_slice(&unit.to_be_bytes());
			at += 2;
		}
	}
	raw
}

impl Header {
	/// Decodes the header and returns it with the declared object count.
	pub fn read<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
		let record = HeaderRecord::read(reader)?;
		if record.version != FORMAT_VERSION {
			return Err(Error::Format { found: record.version });
		}
		let style = Style::from_tag(record.style).unwrap_or_else(|| {
			warn!("unknown style tag {:?}, using {:?}", record.style, Style::default());
			Style::default()
		});
		if record.theme >= THEME_COUNT {
			warn!("theme {} out of range, reducing mod {}", record.theme, THEME_COUNT);
		}
		let header = Header {
			creation_year: record.creation_year,
			creation_month: record.creation_month,
			creation_day: record.creation_day,
			creation_hour: record.creation_hour,
			creation_minute: record.creation_minute,
			unk16: record.unk16,
			unk17: record.unk17,
			unk18: record.unk18,
			unk20: record.unk20,
			name: decode_name(&record.name),
			style,
			unk6c: record.unk6c,
			theme: record.theme % THEME_COUNT,
			unk6e: record.unk6e,
			unk6f: record.unk6f,
			time_limit: record.time_limit,
			autoscroll: record.autoscroll,
			unk73: record.unk73,
			unk74: record.unk74,
			unk78: record.unk78,
			unkd8: record.unkd8,
			unkdc: record.unkdc,
		};
		Ok((header, record.num_items as usize))
	}

	/// Checksum is left zero, to be spliced in once the whole blob exists.
	pub fn write<W: Write>(&self, writer: &mut W, num_items: u32) -> std::io::Result<()> {
		HeaderRecord {
			version: FORMAT_VERSION,
			checksum: 0,
			creation_year: self.creation_year,
			creation_month: self.creation_month,
			creation_day: self.creation_day,
			creation_hour: self.creation_hour,
			creation_minute: self.creation_minute,
			unk16: self.unk16,
			unk17: self.unk17,
			unk18: self.unk18,
			unk20: self.unk20,
			name: encode_name(&self.name),
			style: self.style.tag(),
			unk6c: self.unk6c,
			theme: self.theme,
			unk6e: self.unk6e,
			unk6f: self.unk6f,
			time_limit: self.time_limit,
			autoscroll: self.autoscroll,
			unk73: self.unk73,
			unk74: self.unk74,
			unk78: self.unk78,
			unkd8: self.unkd8,
			unkdc: self.unkdc,
			num_items,
		}.write(writer)
	}
}
