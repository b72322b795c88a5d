pub mod number;
pub mod text_entry;

pub use number::{
    ByteWidgetFactory, DoubleWidgetFactory, FloatWidgetFactory, IntegerWidgetFactory,
    LongWidgetFactory, NumberWidgetFactory, ShortWidgetFactory,
};
pub use text_entry::TextEntry;
