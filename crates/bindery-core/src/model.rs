use derive_more::Display;
use serde::Serialize;

///
/// BindableType
///
/// Value category of a bindable property as recorded in metadata.
/// Unsupported members never reach a metadata table, so there is no
/// variant for them.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum BindableType {
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
}

impl BindableType {
    /// Categories that can be assigned through `update_int`.
    #[must_use]
    pub const fn is_int_like(self) -> bool {
        matches!(self, Self::Int | Self::Enum | Self::FlagsEnum)
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
}

///
/// BindablePropertyInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BindablePropertyInfo {
    pub bind_type: BindableType,
    pub name: &'static str,
    pub type_full_name: &'static str,

    /// True when the property is reached through an ancestor or a
    /// hand-written accessor rather than a generated one.
    pub inherited: bool,
}

impl BindablePropertyInfo {
    #[must_use]
    pub const fn new(
        bind_type: BindableType,
        name: &'static str,
        type_full_name: &'static str,
        inherited: bool,
    ) -> Self {
        Self {
            bind_type,
            name,
            type_full_name,
            inherited,
        }
    }
}

///
/// BindableTypeInfo
///
/// Immutable per-type descriptor. One instance per generated type lives in
/// static memory.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BindableTypeInfo {
    pub type_name: &'static str,
    pub type_full_name: &'static str,
    pub sealed: bool,
    pub properties: &'static [BindablePropertyInfo],
}

impl BindableTypeInfo {
    #[must_use]
    pub const fn new(
        type_name: &'static str,
        type_full_name: &'static str,
        sealed: bool,
        properties: &'static [BindablePropertyInfo],
    ) -> Self {
        Self {
            type_name,
            type_full_name,
            sealed,
            properties,
        }
    }

    /// Look up a property entry by its public name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'static BindablePropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Names in table order.
    pub fn property_names(&self) -> impl Iterator<Item = &'static str> {
        self.properties.iter().map(|p| p.name)
    }
}
