//! ## Crate layout
//! - `call`: event-call descriptors and argument unpacking.
//! - `model`: static per-type metadata tables emitted by the compiler.
//! - `value`: the value shapes pushed to consumers.
//! - `traits`: the binding contract every generated type implements.
//! - `updater`: the thread-local consumer that setters notify.
//! - `event`: the optional per-type change event slot.
//! - `enums`: enum descriptors and the process-wide enum registry.
//!
//! Everything here is referenced by generated code through absolute
//! `::bindery::…` paths, so the public surface is kept flat.

pub mod call;
pub mod enums;
pub mod event;
pub mod model;
pub mod traits;
pub mod updater;
pub mod value;

pub use call::{ArgValue, ArgumentInfo, ArgumentKind, Args, EventCall, FromArg, InvokeError};
pub use enums::{AliasInfo, EnumInfo, EnumValueInfo, LOCALE_NONE};
pub use event::ChangeEvent;
pub use model::{BindablePropertyInfo, BindableType, BindableTypeInfo};
pub use traits::{BindableEnum, BindableModel, EventRegister, Invoked, ModelSink};
pub use updater::{Updater, set_updater, take_updater, update_ui};
pub use value::{PropertyValue, Sprite};
