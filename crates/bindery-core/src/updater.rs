//! The consumer notified by generated setters.
//!
//! Each thread owns at most one `Updater`. Setters call [`update_ui`], which
//! is a no-op until an updater is installed.

use crate::{traits::BindableModel, value::PropertyValue};
use std::cell::RefCell;

///
/// Updater
///

pub trait Updater {
    fn update_ui(&mut self, model: &dyn BindableModel, property_name: &str, value: PropertyValue<'_>);
}

thread_local! {
    static UPDATER: RefCell<Option<Box<dyn Updater>>> = const { RefCell::new(None) };
}

/// Install the consumer for the current thread, returning the previous one.
pub fn set_updater(updater: Box<dyn Updater>) -> Option<Box<dyn Updater>> {
    UPDATER.with_borrow_mut(|slot| slot.replace(updater))
}

/// Remove the consumer for the current thread.
pub fn take_updater() -> Option<Box<dyn Updater>> {
    UPDATER.with_borrow_mut(Option::take)
}

/// Push a changed value to the current thread's consumer.
pub fn update_ui(model: &dyn BindableModel, property_name: &str, value: PropertyValue<'_>) {
    UPDATER.with(|slot| {
        // an updater that writes back into a model lands here while the slot is held
        let Ok(mut slot) = slot.try_borrow_mut() else {
            tracing::warn!(
                property = property_name,
                "re-entrant update_ui dropped while the updater is running"
            );
            return;
        };

        if let Some(updater) = slot.as_mut() {
            updater.update_ui(model, property_name, value);
        }
    });
}
