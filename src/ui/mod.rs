//! Data-bound UI widgets
pub mod binding;
pub mod widgets;

pub use binding::{Binding, DefaultBinding};
pub use widgets::{
    ByteWidgetFactory, DoubleWidgetFactory, FloatWidgetFactory, IntegerWidgetFactory,
    LongWidgetFactory, NumberWidgetFactory, ShortWidgetFactory, TextEntry,
};
