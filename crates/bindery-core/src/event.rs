use std::{any::Any, fmt};

type Handler<T> = Box<dyn FnMut(&str, &T, &dyn Any)>;

///
/// ChangeEvent
///
/// Per-instance property-changed event. Handlers receive the property name,
/// the owner after the write, and the value held before the write.
///

pub struct ChangeEvent<T> {
    handlers: Vec<Handler<T>>,
}

impl<T> ChangeEvent<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&str, &T, &dyn Any) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Call every handler in subscription order.
    pub fn invoke(&mut self, property_name: &str, owner: &T, old_value: &dyn Any) {
        for handler in &mut self.handlers {
            handler(property_name, owner, old_value);
        }
    }

    /// Move handlers out of `other` and append them after this event's own.
    ///
    /// Generated code takes the event out of its owner before invoking it;
    /// anything subscribed on the owner meanwhile is folded back here.
    pub fn absorb(&mut self, other: &mut Self) {
        self.handlers.append(&mut other.handlers);
    }
}

impl<T> Default for ChangeEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChangeEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
