//! Code emission for the binding compiler.
//!
//! [`generate`] analyses a program and turns every eligible type into one
//! Rust source unit, every event-register type into an `EventRegister`
//! unit, plus one index file per namespace that pulls the units in. Build scripts usually go through the [`build!`] macro instead.

mod accessor;
mod dispatch;
mod enums;
mod event;
mod event_call;
mod helper;
mod index;
mod macros;
mod metadata;
mod model;
mod push;
mod structure;

pub use index::{ROOT_INDEX, index_file_name};

use crate::event_call::EventBuilder;
use bindery_schema::{
    diagnostic::Diagnostic,
    prelude::*,
    registry::{EnumDescriptor, EnumRegistry},
    session::Session,
};
use proc_macro2::TokenStream;
use quote::quote;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Banner written at the top of every generated file.
pub const HEADER: &str = "// @generated by bindery. Do not edit.\n\n";

///
/// EmitError
///
/// Failure while emitting a single type. The type is left out of the
/// output; other types are unaffected.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EmitError {
    #[error("invalid identifier '{0}'")]
    InvalidIdent(String),

    #[error("injected statement does not parse: '{0}'")]
    InvalidInjection(String),

    #[error("invalid path '{0}'")]
    InvalidPath(String),

    #[error("invalid type '{0}'")]
    InvalidType(String),
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] bindery_schema::Error),
}

///
/// GeneratedUnit
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedUnit {
    /// File name relative to the output directory.
    pub file_name: String,

    /// Full name of the type, `None` for namespace indexes.
    pub type_name: Option<String>,

    /// Namespace the unit is indexed under.
    pub namespace: Option<String>,

    pub code: String,
}

///
/// Omitted
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Omitted {
    pub type_name: String,
    pub error: EmitError,
}

///
/// Output
///

#[derive(Clone, Debug, Default)]
pub struct Output {
    pub units: Vec<GeneratedUnit>,
    pub event_units: Vec<GeneratedUnit>,
    pub indexes: Vec<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
    pub omitted: Vec<Omitted>,
}

impl Output {
    /// Unit generated for `full_name`.
    #[must_use]
    pub fn unit(&self, full_name: &str) -> Option<&GeneratedUnit> {
        self.units
            .iter()
            .find(|u| u.type_name.as_deref() == Some(full_name))
    }

    /// `EventRegister` unit generated for `full_name`.
    #[must_use]
    pub fn event_unit(&self, full_name: &str) -> Option<&GeneratedUnit> {
        self.event_units
            .iter()
            .find(|u| u.type_name.as_deref() == Some(full_name))
    }

    /// Units, event units and indexes together.
    pub fn files(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.units
            .iter()
            .chain(&self.event_units)
            .chain(&self.indexes)
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for file in self.files() {
            let path = dir.join(&file.file_name);
            fs::write(&path, &file.code)?;
            written.push(path);
        }

        tracing::debug!(dir = %dir.display(), files = written.len(), "output written");

        Ok(written)
    }
}

/// Analyse `program` and emit every eligible type.
pub fn generate(program: &Program, options: Options) -> Result<Output, Error> {
    let mut session = Session::analyze(program, options)?;
    let options = session.options().clone();

    let (types, event_types, registry) = session.split_mut();
    let mut output = Output::default();

    for ty in types {
        let pending = pending_enums(ty, registry);

        let result = TypeBuilder::new(&options, ty, pending).and_then(TypeBuilder::generate);
        match result {
            Ok(emitted) => {
                for enum_name in &emitted.enums {
                    registry.mark_emitted(enum_name);
                }
                output.units.push(GeneratedUnit {
                    file_name: unit_file_name(&ty.full_name),
                    type_name: Some(ty.full_name.clone()),
                    namespace: ty.namespace.clone(),
                    code: render(&options, &emitted.code),
                });
            }
            Err(error) => {
                tracing::warn!(type_name = %ty.full_name, %error, "type omitted from output");
                output.omitted.push(Omitted {
                    type_name: ty.full_name.clone(),
                    error,
                });
            }
        }
    }

    for ty in event_types {
        match EventBuilder::new(&options, ty).and_then(EventBuilder::generate) {
            Ok(code) => output.event_units.push(GeneratedUnit {
                file_name: event_unit_file_name(&ty.full_name),
                type_name: Some(ty.full_name.clone()),
                namespace: ty.namespace.clone(),
                code: render(&options, &code),
            }),
            Err(error) => {
                tracing::warn!(type_name = %ty.full_name, %error, "event type omitted from output");
                output.omitted.push(Omitted {
                    type_name: ty.full_name.clone(),
                    error,
                });
            }
        }
    }

    output.indexes = index::generate(&options, output.units.iter().chain(&output.event_units));
    output.diagnostics = session.into_diagnostics().into_items();

    tracing::debug!(
        units = output.units.len(),
        event_units = output.event_units.len(),
        omitted = output.omitted.len(),
        "generation complete"
    );

    Ok(output)
}

// pending_enums
// enums used by the type's own properties that no unit carries yet
fn pending_enums(ty: &TypeDescriptor, registry: &EnumRegistry) -> Vec<EnumDescriptor> {
    let names = ty
        .accessor_properties()
        .filter_map(|p| p.enum_name.as_deref());

    registry.pending(names).into_iter().cloned().collect()
}

/// `game::Player` is written to `game.Player.g.rs`.
#[must_use]
pub fn unit_file_name(full_name: &str) -> String {
    format!("{}.g.rs", full_name.replace("::", "."))
}

/// `game::Shop` is written to `game.Shop.events.g.rs`.
#[must_use]
pub fn event_unit_file_name(full_name: &str) -> String {
    format!("{}.events.g.rs", full_name.replace("::", "."))
}

fn render(options: &Options, tokens: &TokenStream) -> String {
    let code = tokens.to_string();

    if options.header {
        format!("{HEADER}{code}\n")
    } else {
        format!("{code}\n")
    }
}

///
/// Emitted
///

pub(crate) struct Emitted {
    pub(crate) code: TokenStream,
    pub(crate) enums: Vec<String>,
}

///
/// TypeBuilder
///

pub(crate) struct TypeBuilder<'a> {
    pub(crate) options: &'a Options,
    pub(crate) ty: &'a TypeDescriptor,
    pub(crate) enums: Vec<EnumDescriptor>,
    pub(crate) runtime: syn::Path,
    pub(crate) self_path: syn::Path,
}

impl<'a> TypeBuilder<'a> {
    pub(crate) fn new(
        options: &'a Options,
        ty: &'a TypeDescriptor,
        enums: Vec<EnumDescriptor>,
    ) -> Result<Self, EmitError> {
        Ok(Self {
            options,
            ty,
            enums,
            runtime: helper::parse_path(&options.runtime_path)?,
            self_path: helper::item_path(options, &ty.full_name)?,
        })
    }

    /// Emit the whole unit: struct, inherent impl, enum impls and the
    /// `BindableModel` impl.
    pub(crate) fn generate(self) -> Result<Emitted, EmitError> {
        let path = &self.self_path;

        let structure = structure::generate(&self)?;
        let metadata = metadata::generate(&self)?;
        let event = event::generate(&self);
        let registration = enums::generate_registration(&self)?;
        let accessors = accessor::generate(&self)?;
        let enum_impls = enums::generate_impls(&self)?;
        let model = model::generate(&self)?;

        let code = quote! {
            #structure

            impl #path {
                #metadata
                #event
                #registration
                #accessors
            }

            #enum_impls
            #model
        };

        tracing::trace!(type_name = %self.ty.full_name, enums = self.enums.len(), "unit emitted");

        Ok(Emitted {
            code,
            enums: self.enums.into_iter().map(|e| e.full_name).collect(),
        })
    }

    pub(crate) fn use_change_event(&self) -> bool {
        self.ty.mode == GenerationMode::Bindable && self.ty.use_change_event
    }

    /// `#[inline]` for final methods.
    pub(crate) fn inline_attr(&self) -> TokenStream {
        match self.ty.method_kind() {
            MethodKind::Final => quote!(#[inline]),
            MethodKind::Overridable | MethodKind::Refinement => quote!(),
        }
    }

    /// Access path to the nearest ancestor implementing the contract.
    pub(crate) fn delegate_path(&self) -> Option<TokenStream> {
        match self.ty.method_kind() {
            MethodKind::Refinement => self.ty.bindable_ancestor_depth.map(helper::base_access),
            MethodKind::Final | MethodKind::Overridable => None,
        }
    }

    /// Enums behind the type's own properties, first use first.
    pub(crate) fn referenced_enums(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();

        self.ty
            .accessor_properties()
            .filter_map(|p| p.enum_name.clone())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Select among `arms` by `property_name`.
    pub(crate) fn select(&self, arms: &[(String, TokenStream)]) -> TokenStream {
        helper::select(self.options, &quote!(property_name), arms)
    }
}
