//! Resolved descriptors.
//!
//! The scanner creates one [`TypeDescriptor`] per eligible type, the
//! extractor fills `fields` and `own_properties`, and the resolver fills
//! `merged_properties`. Emitters only read them.

use crate::{decl::InjectionPoint, prelude::*};
use convert_case::{Case, Casing};

///
/// ValueCategory
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum ValueCategory {
    Bool,
    Enum,
    FlagsEnum,
    Float,
    Int,
    ListBool,
    ListEnum,
    ListFloat,
    ListInt,
    ListSprite,
    ListString,
    Sprite,
    String,
    Unsupported,
}

impl ValueCategory {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::ListBool
                | Self::ListEnum
                | Self::ListFloat
                | Self::ListInt
                | Self::ListSprite
                | Self::ListString
        )
    }

    /// Categories backed by a declared enum.
    #[must_use]
    pub const fn is_enum(self) -> bool {
        matches!(self, Self::Enum | Self::FlagsEnum | Self::ListEnum)
    }

    /// Scalars handed out by value from getters.
    #[must_use]
    pub const fn is_copy(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Enum | Self::FlagsEnum | Self::Float | Self::Int
        )
    }

    /// Name-dispatch method that assigns this category, if any.
    #[must_use]
    pub const fn dispatch_kind(self) -> Option<DispatchKind> {
        match self {
            Self::Int | Self::Enum | Self::FlagsEnum => Some(DispatchKind::Int),
            Self::Float => Some(DispatchKind::Float),
            Self::String => Some(DispatchKind::String),
            Self::Bool => Some(DispatchKind::Bool),
            _ => None,
        }
    }

    /// List category with this category as its element.
    #[must_use]
    pub const fn list_of(self) -> Option<Self> {
        match self {
            Self::Bool => Some(Self::ListBool),
            Self::Enum | Self::FlagsEnum => Some(Self::ListEnum),
            Self::Float => Some(Self::ListFloat),
            Self::Int => Some(Self::ListInt),
            Self::Sprite => Some(Self::ListSprite),
            Self::String => Some(Self::ListString),
            _ => None,
        }
    }
}

///
/// DispatchKind
///
/// One of the four `update_*` methods.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum DispatchKind {
    Bool,
    Float,
    Int,
    String,
}

impl DispatchKind {
    pub const ALL: [Self; 4] = [Self::Int, Self::Float, Self::String, Self::Bool];
}

///
/// PropertyOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum PropertyOrigin {
    /// Reached through an ancestor, generated or hand-written.
    Ancestor,

    /// Hand-written on the type itself.
    Declared,

    /// Generated from one of the type's own fields.
    Field,
}

///
/// InjectedCode
///
/// Statements to splice into an accessor, grouped by injection point.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct InjectedCode {
    pub on_get: Vec<String>,
    pub on_set_before_change: Vec<String>,
    pub on_set_after_change: Vec<String>,
}

impl InjectedCode {
    /// Append a `;`-delimited fragment, skipping blank statements.
    pub fn push(&mut self, point: InjectionPoint, fragment: &str) {
        let slot = match point {
            InjectionPoint::OnGet => &mut self.on_get,
            InjectionPoint::OnSetBeforeChange => &mut self.on_set_before_change,
            InjectionPoint::OnSetAfterChange => &mut self.on_set_after_change,
        };

        slot.extend(
            fragment
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        );
    }

    #[must_use]
    pub fn get(&self, point: InjectionPoint) -> &[String] {
        match point {
            InjectionPoint::OnGet => &self.on_get,
            InjectionPoint::OnSetBeforeChange => &self.on_set_before_change,
            InjectionPoint::OnSetAfterChange => &self.on_set_after_change,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_get.is_empty()
            && self.on_set_before_change.is_empty()
            && self.on_set_after_change.is_empty()
    }
}

///
/// PropertyDescriptor
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    /// Backing field; `None` for hand-written properties.
    pub field_name: Option<String>,
    pub property_name: String,
    pub category: ValueCategory,

    /// Type as written in the declaration.
    pub declared_type: String,

    /// Normalised type name recorded in metadata.
    pub type_full_name: String,

    /// Full name of the enum for enum categories.
    pub enum_name: Option<String>,

    pub origin: PropertyOrigin,

    /// Type that owns the storage or the getter.
    pub declaring_type: String,

    pub also_notify: Vec<String>,
    pub injected: InjectedCode,
    pub suppress_notify: bool,

    /// Getter method for hand-written properties.
    pub getter_fn: Option<String>,

    pub doc: Option<String>,
}

impl PropertyDescriptor {
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        self.enum_name.is_some()
    }

    #[must_use]
    pub fn is_inherited(&self) -> bool {
        self.origin != PropertyOrigin::Field
    }

    /// Method that reads the current value.
    #[must_use]
    pub fn getter_name(&self) -> String {
        self.getter_fn
            .clone()
            .unwrap_or_else(|| self.property_name.to_case(Case::Snake))
    }

    /// Generated setter name.
    #[must_use]
    pub fn setter_name(&self) -> String {
        format!("set_{}", self.property_name.to_case(Case::Snake))
    }

    /// Copy of this descriptor as seen from a derived type.
    #[must_use]
    pub fn inherited(&self) -> Self {
        Self {
            origin: PropertyOrigin::Ancestor,
            also_notify: Vec::new(),
            injected: InjectedCode::default(),
            doc: None,
            ..self.clone()
        }
    }
}

///
/// FieldSlot
///
/// One declared field as it appears in the generated struct.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldSlot {
    pub name: String,
    pub declared_type: String,
    pub category: ValueCategory,
    pub enum_name: Option<String>,
    pub doc: Option<String>,
}

///
/// GenerationMode
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Bindable,
    AutoNotify,
}

///
/// MethodKind
///
/// How generated trait methods relate to an ancestor's.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum MethodKind {
    /// Sealed, nothing to delegate to.
    Final,

    /// Open, nothing to delegate to.
    Overridable,

    /// An ancestor implements the contract; its version runs first.
    Refinement,
}

///
/// TypeDescriptor
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub full_name: String,
    pub simple_name: String,
    pub namespace: Option<String>,
    pub mode: GenerationMode,
    pub accessibility: Accessibility,
    pub is_value_type: bool,
    pub is_sealed: bool,

    /// Base as resolved: a full name when declared in the program, the
    /// written path otherwise.
    pub base: Option<String>,

    /// Class ancestors known to the program, nearest first.
    pub base_type_chain: Vec<String>,

    /// Depth (1 = direct base) of the nearest processed ancestor.
    pub bindable_ancestor_depth: Option<usize>,

    pub ancestor_already_implements: bool,
    pub ancestor_declared_change_event: bool,
    pub use_change_event: bool,

    pub fields: Vec<FieldSlot>,
    pub own_properties: Vec<PropertyDescriptor>,
    pub merged_properties: Vec<PropertyDescriptor>,

    pub derives: Vec<String>,
    pub doc: Option<String>,
}

impl TypeDescriptor {
    #[must_use]
    pub const fn method_kind(&self) -> MethodKind {
        if self.ancestor_already_implements {
            MethodKind::Refinement
        } else if self.is_sealed {
            MethodKind::Final
        } else {
            MethodKind::Overridable
        }
    }

    /// Own properties that get accessors.
    pub fn accessor_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.own_properties.iter().filter(|p| !p.suppress_notify)
    }

    /// Own properties assignable through `kind`.
    pub fn dispatch_properties(
        &self,
        kind: DispatchKind,
    ) -> impl Iterator<Item = &PropertyDescriptor> {
        self.accessor_properties()
            .filter(move |p| p.category.dispatch_kind() == Some(kind))
    }

    /// Merged entry by public name.
    #[must_use]
    pub fn merged(&self, property_name: &str) -> Option<&PropertyDescriptor> {
        self.merged_properties
            .iter()
            .find(|p| p.property_name == property_name)
    }

    /// Embedding depth of `declaring_type` below this type; 0 for itself.
    #[must_use]
    pub fn depth_of(&self, declaring_type: &str) -> Option<usize> {
        if declaring_type == self.full_name {
            return Some(0);
        }

        self.base_type_chain
            .iter()
            .position(|t| t == declaring_type)
            .map(|i| i + 1)
    }
}

///
/// ArgumentKind
///
/// Classification of an event-call argument.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum ArgumentKind {
    Bool,

    /// Any other concrete type, passed through as a boxed value.
    Custom,

    Enum,
    Float,
    Int,
    Sprite,
    String,

    /// Collections, borrows and trait objects.
    Unsupported,
}

impl ArgumentKind {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

///
/// ArgumentDescriptor
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub declared_type: String,
    pub type_full_name: String,
    pub kind: ArgumentKind,
    pub enum_name: Option<String>,

    /// Passed as `&mut`.
    pub by_ref: bool,
}

///
/// EventCallDescriptor
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EventCallDescriptor {
    pub method_name: String,
    pub event_name: String,
    pub views: Vec<String>,
    pub is_static: bool,
    pub returns: Option<String>,
    pub arguments: Vec<ArgumentDescriptor>,
}

///
/// EventTypeDescriptor
///
/// A type whose annotated methods are exposed by event name.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EventTypeDescriptor {
    pub full_name: String,
    pub simple_name: String,
    pub namespace: Option<String>,
    pub is_sealed: bool,

    /// Class ancestors reachable through embedded `base` fields, nearest
    /// first.
    pub base_type_chain: Vec<String>,

    /// Depth (1 = direct base) of the nearest registering ancestor.
    pub register_ancestor_depth: Option<usize>,

    pub calls: Vec<EventCallDescriptor>,
}

impl EventTypeDescriptor {
    #[must_use]
    pub const fn method_kind(&self) -> MethodKind {
        if self.register_ancestor_depth.is_some() {
            MethodKind::Refinement
        } else if self.is_sealed {
            MethodKind::Final
        } else {
            MethodKind::Overridable
        }
    }
}
