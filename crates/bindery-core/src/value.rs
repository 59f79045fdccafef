use crate::model::BindableType;
use serde::Serialize;
use std::borrow::Cow;

///
/// Sprite
///
/// Opaque handle to an external image resource. The binding layer never
/// looks inside it; it is only compared and forwarded.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct Sprite {
    path: String,
}

impl Sprite {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

///
/// PropertyValue
///
/// A property value on its way to a consumer. Scalars are copied; strings,
/// sprites and lists borrow from the model unless they had to be converted
/// (enum lists are always sent as integers).
///

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue<'a> {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(Cow<'a, str>),
    Sprite(Cow<'a, Sprite>),
    ListInt(Cow<'a, [i32]>),
    ListFloat(Cow<'a, [f32]>),
    ListBool(Cow<'a, [bool]>),
    ListString(Cow<'a, [String]>),
    ListSprite(Cow<'a, [Sprite]>),
    ListEnum(Cow<'a, [i32]>),
}

impl PropertyValue<'_> {
    /// Detach the value from the model it was borrowed from.
    #[must_use]
    pub fn into_owned(self) -> PropertyValue<'static> {
        match self {
            Self::Int(v) => PropertyValue::Int(v),
            Self::Float(v) => PropertyValue::Float(v),
            Self::Bool(v) => PropertyValue::Bool(v),
            Self::String(v) => PropertyValue::String(Cow::Owned(v.into_owned())),
            Self::Sprite(v) => PropertyValue::Sprite(Cow::Owned(v.into_owned())),
            Self::ListInt(v) => PropertyValue::ListInt(Cow::Owned(v.into_owned())),
            Self::ListFloat(v) => PropertyValue::ListFloat(Cow::Owned(v.into_owned())),
            Self::ListBool(v) => PropertyValue::ListBool(Cow::Owned(v.into_owned())),
            Self::ListString(v) => PropertyValue::ListString(Cow::Owned(v.into_owned())),
            Self::ListSprite(v) => PropertyValue::ListSprite(Cow::Owned(v.into_owned())),
            Self::ListEnum(v) => PropertyValue::ListEnum(Cow::Owned(v.into_owned())),
        }
    }

    /// Closest metadata category for this value. Enum scalars travel as
    /// `Int`, so they report `Int` here.
    #[must_use]
    pub const fn bind_type(&self) -> BindableType {
        match self {
            Self::Int(_) => BindableType::Int,
            Self::Float(_) => BindableType::Float,
            Self::Bool(_) => BindableType::Bool,
            Self::String(_) => BindableType::String,
            Self::Sprite(_) => BindableType::Sprite,
            Self::ListInt(_) => BindableType::ListInt,
            Self::ListFloat(_) => BindableType::ListFloat,
            Self::ListBool(_) => BindableType::ListBool,
            Self::ListString(_) => BindableType::ListString,
            Self::ListSprite(_) => BindableType::ListSprite,
            Self::ListEnum(_) => BindableType::ListEnum,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for PropertyValue<'_> {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PropertyValue<'_> {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<'a> From<&'a str> for PropertyValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::String(Cow::Borrowed(value))
    }
}

impl From<String> for PropertyValue<'_> {
    fn from(value: String) -> Self {
        Self::String(Cow::Owned(value))
    }
}

impl<'a> From<&'a Sprite> for PropertyValue<'a> {
    fn from(value: &'a Sprite) -> Self {
        Self::Sprite(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [i32]> for PropertyValue<'a> {
    fn from(value: &'a [i32]) -> Self {
        Self::ListInt(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [f32]> for PropertyValue<'a> {
    fn from(value: &'a [f32]) -> Self {
        Self::ListFloat(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [bool]> for PropertyValue<'a> {
    fn from(value: &'a [bool]) -> Self {
        Self::ListBool(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [String]> for PropertyValue<'a> {
    fn from(value: &'a [String]) -> Self {
        Self::ListString(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a [Sprite]> for PropertyValue<'a> {
    fn from(value: &'a [Sprite]) -> Self {
        Self::ListSprite(Cow::Borrowed(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_owned_keeps_contents() {
        let names = vec!["a".to_string(), "b".to_string()];
        let value = PropertyValue::from(names.as_slice()).into_owned();
        drop(names);

        let PropertyValue::ListString(list) = value else {
            panic!("expected a string list");
        };
        assert_eq!(list.as_ref(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn scalar_accessors_match_variant() {
        assert_eq!(PropertyValue::from(7).as_int(), Some(7));
        assert_eq!(PropertyValue::from(7).as_bool(), None);
        assert_eq!(PropertyValue::from("hi").as_str(), Some("hi"));
        assert_eq!(PropertyValue::from(true).bind_type(), BindableType::Bool);
    }
}
