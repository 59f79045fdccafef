//! Input declarations.
//!
//! Annotations reach the compiler already resolved into these shapes. They
//! are usually loaded from a `bindery.toml` manifest, but any serde format
//! works.

use crate::prelude::*;

///
/// Program
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Program {
    pub types: Vec<TypeDecl>,
    pub enums: Vec<EnumDecl>,
}

impl Program {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a type by full name.
    #[must_use]
    pub fn type_decl(&self, full_name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.full_name() == full_name)
    }

    /// Find an enum by full name.
    #[must_use]
    pub fn enum_decl(&self, full_name: &str) -> Option<&EnumDecl> {
        self.enums.iter().find(|e| e.full_name() == full_name)
    }

    /// Resolve a type reference written inside `namespace`: first relative
    /// to the namespace, then as an absolute path.
    #[must_use]
    pub fn resolve_type(&self, namespace: Option<&str>, name: &str) -> Option<&TypeDecl> {
        resolve_relative(namespace, name, |path| self.type_decl(path))
    }

    /// Resolve an enum reference written inside `namespace`.
    #[must_use]
    pub fn resolve_enum(&self, namespace: Option<&str>, name: &str) -> Option<&EnumDecl> {
        resolve_relative(namespace, name, |path| self.enum_decl(path))
    }
}

fn resolve_relative<'a, T>(
    namespace: Option<&str>,
    name: &str,
    lookup: impl Fn(&str) -> Option<&'a T>,
) -> Option<&'a T> {
    let name = name.trim().trim_start_matches("crate::");

    namespace
        .filter(|ns| !ns.is_empty())
        .and_then(|ns| lookup(&join_path(Some(ns), name)))
        .or_else(|| lookup(name))
}

///
/// TypeKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
}

///
/// Accessibility
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum Accessibility {
    Internal,
    Private,
    Protected,
    #[default]
    Public,
}

impl Accessibility {
    /// Visible outside the declaring type.
    #[must_use]
    pub const fn is_externally_visible(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

///
/// TypeAttribute
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeAttribute {
    Bindable {
        #[serde(default)]
        on_property_changed: bool,
    },
    EventRegister,
}

///
/// TypeDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeDecl {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub kind: TypeKind,

    #[serde(default)]
    pub accessibility: Accessibility,

    #[serde(default)]
    pub partial: bool,

    #[serde(default)]
    pub sealed: bool,

    /// Containing type, for nested declarations.
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub attributes: Vec<TypeAttribute>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    /// Hand-written properties.
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,

    /// Hand-written methods; only annotated ones are read.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,

    #[serde(default)]
    pub derives: Vec<String>,

    #[serde(default)]
    pub doc: Option<String>,
}

impl TypeDecl {
    #[must_use]
    pub fn full_name(&self) -> String {
        join_path(self.namespace.as_deref(), &self.name)
    }

    /// The `on_property_changed` flag of the bindable attribute, when present.
    #[must_use]
    pub fn bindable(&self) -> Option<bool> {
        self.attributes.iter().find_map(|attr| match attr {
            TypeAttribute::Bindable {
                on_property_changed,
            } => Some(*on_property_changed),
            TypeAttribute::EventRegister => None,
        })
    }

    /// Carries the event-register annotation.
    #[must_use]
    pub fn event_register(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, TypeAttribute::EventRegister))
    }

    #[must_use]
    pub fn has_auto_notify_fields(&self) -> bool {
        self.fields.iter().any(FieldDecl::auto_notify)
    }

    #[must_use]
    pub const fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct)
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.parent.is_some()
    }
}

///
/// FieldDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: String,

    #[serde(default)]
    pub attributes: Vec<FieldAttribute>,

    #[serde(default)]
    pub doc: Option<String>,
}

impl FieldDecl {
    /// Explicit rename, last one wins.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.attributes.iter().rev().find_map(|attr| match attr {
            FieldAttribute::PropertyName { name } => Some(name.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn dont_notify(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, FieldAttribute::DontNotify))
    }

    /// Also-notify targets in declaration order.
    pub fn also_notify(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().filter_map(|attr| match attr {
            FieldAttribute::AlsoNotify { target } => Some(target.as_str()),
            _ => None,
        })
    }

    /// Code fragments in declaration order.
    pub fn code_injections(&self) -> impl Iterator<Item = (InjectionPoint, &str)> {
        self.attributes.iter().filter_map(|attr| match attr {
            FieldAttribute::CodeInject { point, code } => Some((*point, code.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn auto_notify(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, FieldAttribute::AutoNotify { .. }))
    }

    /// Name override carried by the auto-notify annotation.
    #[must_use]
    pub fn auto_notify_name(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            FieldAttribute::AutoNotify { property_name } => property_name.as_deref(),
            _ => None,
        })
    }
}

///
/// FieldAttribute
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldAttribute {
    AlsoNotify {
        target: String,
    },
    AutoNotify {
        #[serde(default)]
        property_name: Option<String>,
    },
    CodeInject {
        point: InjectionPoint,
        code: String,
    },
    DontNotify,
    PropertyName {
        name: String,
    },
}

///
/// InjectionPoint
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InjectionPoint {
    OnGet,
    OnSetBeforeChange,
    OnSetAfterChange,
}

///
/// PropertyDecl
///
/// A hand-written property. The compiler never generates code for it; it
/// only lists it in metadata and may read it through `getter_fn`.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: String,

    /// Accessibility of the getter; `None` means write-only.
    #[serde(default = "default_getter")]
    pub getter: Option<Accessibility>,

    /// Method that reads the property. Defaults to the snake_case name.
    #[serde(default)]
    pub getter_fn: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_getter() -> Option<Accessibility> {
    Some(Accessibility::Public)
}

///
/// MethodDecl
///
/// A hand-written method. Only methods carrying `event_call` are exposed.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MethodDecl {
    pub name: String,

    #[serde(default)]
    pub args: Vec<ArgDecl>,

    /// Return type; `None` for `()`.
    #[serde(default)]
    pub returns: Option<String>,

    /// Associated function without a receiver.
    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub is_generic: bool,

    #[serde(default)]
    pub is_async: bool,

    #[serde(default)]
    pub attributes: Vec<MethodAttribute>,
}

impl MethodDecl {
    /// The event-call annotation, when present.
    #[must_use]
    pub fn event_call(&self) -> Option<(Option<&str>, &[String])> {
        self.attributes.iter().find_map(|attr| match attr {
            MethodAttribute::EventCall { event_name, views } => {
                Some((event_name.as_deref(), views.as_slice()))
            }
        })
    }
}

///
/// MethodAttribute
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodAttribute {
    EventCall {
        /// Defaults to the method name.
        #[serde(default)]
        event_name: Option<String>,

        #[serde(default)]
        views: Vec<String>,
    },
}

///
/// ArgDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ArgDecl {
    pub name: String,
    pub ty: String,

    #[serde(default)]
    pub modifier: ArgModifier,
}

///
/// ArgModifier
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum ArgModifier {
    /// Written back by the callee; never exposed.
    Out,

    /// Variadic tail; never exposed.
    Params,

    /// Passed as `&mut`.
    Ref,

    #[default]
    Value,
}

///
/// EnumDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EnumDecl {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub flags: bool,

    #[serde(default)]
    pub values: Vec<EnumValueDecl>,
}

impl EnumDecl {
    #[must_use]
    pub fn full_name(&self) -> String {
        join_path(self.namespace.as_deref(), &self.name)
    }
}

///
/// EnumValueDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EnumValueDecl {
    pub name: String,
    pub value: i32,

    #[serde(default)]
    pub aliases: Vec<AliasDecl>,
}

///
/// AliasDecl
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AliasDecl {
    #[serde(default)]
    pub locale: Option<String>,
    pub text: String,
}

/// Join an optional namespace and a simple name into a `::` path.
#[must_use]
pub fn join_path(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}::{name}"),
        _ => name.to_string(),
    }
}
