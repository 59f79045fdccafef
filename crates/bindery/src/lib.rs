//! ## Crate layout
//! - runtime (re-exported at the root): the binding contract, metadata
//!   tables, value shapes, the consumer hook and the enum registry.
//! - `build`: code emission, used from build scripts.
//! - `config`: `bindery.toml` manifest loading.
//! - `schema`: declarations, descriptors and the analysis passes.
//!
//! Generated code refers to the runtime as `::bindery::…`.

pub use bindery_build as build;
pub use bindery_config_build as config;
pub use bindery_core::*;
pub use bindery_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use bindery_build::build;

/// Include generated bindings written by `build!`.
///
/// `include_bindings!("game")` pulls in every unit of namespace `game`;
/// nested namespaces use dots, `include_bindings!("game.ui")`. Without an
/// argument the types declared outside any namespace are included.
#[macro_export]
macro_rules! include_bindings {
    () => {
        include!(concat!(env!("OUT_DIR"), "/bindery/__root.g.rs"));
    };
    ($namespace:literal) => {
        include!(concat!(env!("OUT_DIR"), "/bindery/", $namespace, ".g.rs"));
    };
}
