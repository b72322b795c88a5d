use crate::error::EngineResult;
use crate::ui::Binding;

pub type Parser<T> = fn(&str) -> EngineResult<T>;
pub type Formatter<T> = fn(&T) -> String;

/// Single-line text field editing a bound value
pub struct TextEntry<T> {
    binding: Box<dyn Binding<T>>,
    parser: Parser<T>,
    formatter: Formatter<T>,
}

impl<T> TextEntry<T> {
    pub fn new(binding: Box<dyn Binding<T>>, parser: Parser<T>, formatter: Formatter<T>) -> Self {
        Self {
            binding,
            parser,
            formatter,
        }
    }

    /// Text for the current bound value; empty while unset
    pub fn text(&self) -> String {
        self.binding
            .get()
            .map(|value| (self.formatter)(&value))
            .unwrap_or_default()
    }

    /// Parse `text` into the binding
    ///
    /// On a parse error the binding keeps its previous value.
    pub fn set_text(&mut self, text: &str) -> EngineResult<()> {
        let value = (self.parser)(text)?;
        self.binding.set(value);
        Ok(())
    }

    pub fn value(&self) -> Option<T> {
        self.binding.get()
    }
}
