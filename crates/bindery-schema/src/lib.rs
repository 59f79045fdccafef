//! Analysis half of the binding compiler.
//!
//! A [`Program`](decl::Program) of declarations goes in; a
//! [`Session`](session::Session) holding one resolved
//! [`TypeDescriptor`](node::TypeDescriptor) per eligible type comes out,
//! plus one [`EventTypeDescriptor`](node::EventTypeDescriptor) per type that
//! exposes event calls.

pub mod decl;
pub mod diagnostic;
pub mod event_call;
pub mod extract;
pub mod node;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod scan;
pub mod session;

use crate::scan::ScanError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        decl::*,
        node::*,
        options::Options,
    };
    pub use derive_more::{Display, FromStr};
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
}
