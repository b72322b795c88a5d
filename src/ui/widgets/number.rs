//! Text-entry factories for the primitive number types
//!
//! Parsing follows `str::parse` for the target type, so out-of-range input
//! ("256" for a byte) is a format error rather than a wrap.

use std::fmt::Display;
use std::str::FromStr;

use super::TextEntry;
use crate::error::{number_format, EngineResult};
use crate::ui::Binding;

/// Builds text entries for one number type
pub trait NumberWidgetFactory {
    type Value: FromStr + Display + Clone + 'static;

    /// Name used in format errors
    const TYPE_NAME: &'static str;

    fn parse(raw: &str) -> EngineResult<Self::Value> {
        raw.parse::<Self::Value>()
            .map_err(|_| number_format(raw, Self::TYPE_NAME))
    }

    /// Value written into a binding that has none yet
    fn default_value() -> Self::Value;

    /// Create a text entry for `binding`, filling it with the default when unset
    fn build(mut binding: Box<dyn Binding<Self::Value>>) -> TextEntry<Self::Value> {
        if binding.get().is_none() {
            binding.set(Self::default_value());
        }
        TextEntry::new(binding, Self::parse, |value| value.to_string())
    }
}

macro_rules! number_widget_factory {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $type_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl NumberWidgetFactory for $name {
            type Value = $ty;
            const TYPE_NAME: &'static str = $type_name;

            fn default_value() -> $ty {
                0 as $ty
            }
        }
    };
}

number_widget_factory!(
    /// Signed 8-bit
    ByteWidgetFactory,
    i8,
    "byte"
);
number_widget_factory!(ShortWidgetFactory, i16, "short");
number_widget_factory!(IntegerWidgetFactory, i32, "integer");
number_widget_factory!(LongWidgetFactory, i64, "long");
number_widget_factory!(FloatWidgetFactory, f32, "float");
number_widget_factory!(DoubleWidgetFactory, f64, "double");
