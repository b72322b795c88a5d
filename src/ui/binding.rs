use std::cell::RefCell;
use std::rc::Rc;

/// Two-way link between a widget and the value it edits
///
/// `get` returns `None` while the bound value is unset.
pub trait Binding<T> {
    fn get(&self) -> Option<T>;
    fn set(&mut self, value: T);
}

/// Binding backed by a shared cell
///
/// Clones share the same value, so the owner keeps one clone and hands
/// another to the widget.
#[derive(Debug)]
pub struct DefaultBinding<T> {
    value: Rc<RefCell<Option<T>>>,
}

impl<T> DefaultBinding<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(value))),
        }
    }

    pub fn unset() -> Self {
        Self {
            value: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T> Clone for DefaultBinding<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<T> Default for DefaultBinding<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T: Clone> Binding<T> for DefaultBinding<T> {
    fn get(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    fn set(&mut self, value: T) {
        *self.value.borrow_mut() = Some(value);
    }
}
