use glam::{IVec2, IVec3};

/// Some volume defined by a minimum and maximum.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinMax<T> {
	pub min: T,
	pub max: T,
}

impl<T> MinMax<T> where T: Clone {
	pub fn new(a: T) -> Self {
		Self { min: a.clone(), max: a }
	}
}

/// Integer vectors compared component by component.
pub trait GridVec: Copy {
	fn min(self, other: Self) -> Self;
	fn max(self, other: Self) -> Self;
	fn all_le(self, other: Self) -> bool;
}

macro_rules! impl_grid_vec {
	($type:ty) => {
		impl GridVec for $type {
			fn min(self, other: Self) -> Self { <$type>::min(self, other) }
			fn max(self, other: Self) -> Self { <$type>::max(self, other) }
			fn all_le(self, other: Self) -> bool { self.cmple(other).all() }
		}
	};
}

impl_grid_vec!(IVec2);
impl_grid_vec!(IVec3);

pub trait VecMinMax<T> {
	fn update(&mut self, v: T);
	fn contains_point(&self, v: T) -> bool;
}

impl<T> VecMinMax<T> for MinMax<T> where T: GridVec {
	fn update(&mut self, a: T) {
		self.min = self.min.min(a);
		self.max = self.max.max(a);
	}
	
	fn contains_point(&self, a: T) -> bool {
		self.min.all_le(a) && a.all_le(self.max)
	}
}

pub trait VecMinMaxFromIterator: Iterator {
	fn min_max(self) -> Option<MinMax<Self::Item>>;
}

impl<T> VecMinMaxFromIterator for T where T: Iterator, T::Item: GridVec {
	fn min_max(mut self) -> Option<MinMax<Self::Item>> {
		let mut min_max = MinMax::new(self.next()?);
		while let Some(a) = self.next() {
			min_max.update(a);
		}
		Some(min_max)
	}
}
