use std::io::{Read, Result, Write};
use arrayvec::ArrayVec;
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use crate::{Readable, Writable};

//primitive impls

macro_rules! impl_prim {
	($type:ty, $read:ident, $write:ident $(, $($endian:tt)*)?) => {
		impl Readable for $type {
			fn read<R: Read>(reader: &mut R) -> Result<Self> {
				reader.$read$($($endian)*)?()
			}
		}

		impl Writable for $type {
			fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
				writer.$write$($($endian)*)?(*self)
			}
		}
	};
}

macro_rules! impl_prim_be {
	($type:ty, $read:ident, $write:ident) => {
		impl_prim!($type, $read, $write, ::<BE>);
	};
}

impl_prim!(u8, read_u8, write_u8);
impl_prim!(i8, read_i8, write_i8);
impl_prim_be!(u16, read_u16, write_u16);
impl_prim_be!(i16, read_i16, write_i16);
impl_prim_be!(u32, read_u32, write_u32);
impl_prim_be!(i32, read_i32, write_i32);
impl_prim_be!(u64, read_u64, write_u64);

//array impls

impl<T: Readable, const N: usize> Readable for [T; N] {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let mut array = ArrayVec::<T, N>::new();
		for _ in 0..N {
			array.push(T::read(reader)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

impl<T: Writable, const N: usize> Writable for [T; N] {
	fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
		for item in self {
			item.write(writer)?;
		}
		Ok(())
	}
}
