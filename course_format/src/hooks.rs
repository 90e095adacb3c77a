use crate::model::{PlacedObject, Style};

/// Callbacks into whatever presents the course. Every method defaults to doing
/// nothing, so `()` can be passed when nobody is listening.
pub trait CourseHooks {
	fn style_changed(&mut self, _style: Style) {}
	fn theme_changed(&mut self, _theme: u8) {}
	/// Once per object, after all of its fields are set.
	fn refresh_list_representation(&mut self, _object: &PlacedObject) {}
	/// Once per object, after all of its fields are set.
	fn refresh_dynamic_sizing(&mut self, _object: &PlacedObject) {}
}

impl CourseHooks for () {}

/// Current style and theme, owned by the caller and handed to whoever renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleContext {
	pub style: Style,
	pub theme: u8,
}

impl CourseHooks for StyleContext {
	fn style_changed(&mut self, style: Style) {
		self.style = style;
	}

	fn theme_changed(&mut self, theme: u8) {
		self.theme = theme;
	}
}
