use crate::{traits::BindableEnum, value::Sprite};
use derive_more::Display;
use serde::Serialize;
use std::any::Any;
use thiserror::Error as ThisError;

///
/// ArgumentKind
///
/// How an event-call argument travels from the host to the method.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum ArgumentKind {
    Bool,
    Custom,
    Enum,
    Float,
    Int,
    Sprite,
    String,
}

///
/// ArgumentInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ArgumentInfo {
    pub type_full_name: &'static str,
    pub kind: ArgumentKind,
    pub name: &'static str,
}

impl ArgumentInfo {
    #[must_use]
    pub const fn new(type_full_name: &'static str, kind: ArgumentKind, name: &'static str) -> Self {
        Self {
            type_full_name,
            kind,
            name,
        }
    }
}

///
/// EventCall
///
/// A method the host may invoke by event name. One static instance per
/// annotated method.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct EventCall {
    pub event_name: &'static str,

    /// Views the call is limited to; empty means every view.
    pub views: &'static [&'static str],

    pub method_name: &'static str,
    pub type_full_name: &'static str,
    pub arguments: &'static [ArgumentInfo],
    pub return_type: Option<&'static str>,
}

impl EventCall {
    #[must_use]
    pub const fn new(
        event_name: &'static str,
        views: &'static [&'static str],
        method_name: &'static str,
        type_full_name: &'static str,
        arguments: &'static [ArgumentInfo],
        return_type: Option<&'static str>,
    ) -> Self {
        Self {
            event_name,
            views,
            method_name,
            type_full_name,
            arguments,
            return_type,
        }
    }

    #[must_use]
    pub fn shown_in(&self, view: &str) -> bool {
        self.views.is_empty() || self.views.contains(&view)
    }
}

///
/// ArgValue
///
/// An argument value supplied by the host.
///

#[derive(Debug)]
pub enum ArgValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Sprite(Sprite),
    Custom(Box<dyn Any>),
}

impl ArgValue {
    pub fn custom<T: Any>(value: T) -> Self {
        Self::Custom(Box::new(value))
    }

    #[must_use]
    pub const fn kind(&self) -> ArgumentKind {
        match self {
            Self::Int(_) => ArgumentKind::Int,
            Self::Float(_) => ArgumentKind::Float,
            Self::Bool(_) => ArgumentKind::Bool,
            Self::String(_) => ArgumentKind::String,
            Self::Sprite(_) => ArgumentKind::Sprite,
            Self::Custom(_) => ArgumentKind::Custom,
        }
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Sprite> for ArgValue {
    fn from(value: Sprite) -> Self {
        Self::Sprite(value)
    }
}

///
/// FromArg
///
/// Scalar argument types that unpack directly from an [`ArgValue`].
///

pub trait FromArg: Sized {
    const KIND: ArgumentKind;

    fn from_arg(value: ArgValue) -> Option<Self>;
}

macro_rules! impl_from_arg {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromArg for $ty {
                const KIND: ArgumentKind = ArgumentKind::$variant;

                fn from_arg(value: ArgValue) -> Option<Self> {
                    match value {
                        ArgValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_arg! {
    i32 => Int,
    f32 => Float,
    bool => Bool,
    String => String,
    Sprite => Sprite,
}

///
/// InvokeError
///

#[derive(Debug, ThisError)]
pub enum InvokeError {
    #[error("argument {index} of '{method}' is not {expected}")]
    ArgumentMismatch {
        method: &'static str,
        index: usize,
        expected: ArgumentKind,
    },

    #[error("'{method}' is missing argument {index}")]
    MissingArgument { method: &'static str, index: usize },

    #[error("no event call named '{0}' in this view")]
    UnknownEvent(String),
}

///
/// Args
///
/// Positional reader over the values passed to one invocation. Generated
/// `invoke` bodies take one value per declared argument, in order.
///

pub struct Args<'a> {
    call: &'a EventCall,
    values: std::vec::IntoIter<ArgValue>,
    index: usize,
}

impl<'a> Args<'a> {
    #[must_use]
    pub fn new(call: &'a EventCall, values: Vec<ArgValue>) -> Self {
        Self {
            call,
            values: values.into_iter(),
            index: 0,
        }
    }

    pub fn value<T: FromArg>(&mut self) -> Result<T, InvokeError> {
        let (index, value) = self.next()?;

        T::from_arg(value).ok_or_else(|| self.mismatch(index, T::KIND))
    }

    /// An enum sent as its integer value.
    pub fn enumeration<E: BindableEnum>(&mut self) -> Result<E, InvokeError> {
        let (index, value) = self.next()?;

        match value {
            ArgValue::Int(v) => E::from_int(v),
            _ => None,
        }
        .ok_or_else(|| self.mismatch(index, ArgumentKind::Enum))
    }

    pub fn custom<T: Any>(&mut self) -> Result<T, InvokeError> {
        let (index, value) = self.next()?;

        match value {
            ArgValue::Custom(boxed) => boxed.downcast::<T>().ok().map(|v| *v),
            _ => None,
        }
        .ok_or_else(|| self.mismatch(index, ArgumentKind::Custom))
    }

    fn next(&mut self) -> Result<(usize, ArgValue), InvokeError> {
        let index = self.index;
        self.index += 1;

        self.values
            .next()
            .map(|value| (index, value))
            .ok_or(InvokeError::MissingArgument {
                method: self.call.method_name,
                index,
            })
    }

    const fn mismatch(&self, index: usize, expected: ArgumentKind) -> InvokeError {
        InvokeError::ArgumentMismatch {
            method: self.call.method_name,
            index,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumInfo;

    static HEAL: EventCall = EventCall::new(
        "Heal",
        &["hud"],
        "heal",
        "game::Player",
        &[ArgumentInfo::new("i32", ArgumentKind::Int, "amount")],
        None,
    );

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Side {
        Left,
        Right,
    }

    impl BindableEnum for Side {
        fn enum_info() -> &'static EnumInfo {
            static INFO: EnumInfo = EnumInfo::new("tests::Side", false, &[]);
            &INFO
        }

        fn to_int(self) -> i32 {
            match self {
                Self::Left => 0,
                Self::Right => 1,
            }
        }

        fn from_int(value: i32) -> Option<Self> {
            match value {
                0 => Some(Self::Left),
                1 => Some(Self::Right),
                _ => None,
            }
        }
    }

    #[test]
    fn views_limit_where_a_call_shows() {
        assert!(HEAL.shown_in("hud"));
        assert!(!HEAL.shown_in("menu"));

        let anywhere = EventCall { views: &[], ..HEAL };
        assert!(anywhere.shown_in("menu"));
    }

    #[test]
    fn args_unpack_in_order() {
        let mut args = Args::new(
            &HEAL,
            vec![7.into(), 1.into(), ArgValue::custom((2u8, 'x')), "hi".into()],
        );

        assert_eq!(args.value::<i32>().expect("int"), 7);
        assert_eq!(args.enumeration::<Side>().expect("enum"), Side::Right);
        assert_eq!(args.custom::<(u8, char)>().expect("custom"), (2, 'x'));
        assert_eq!(args.value::<String>().expect("string"), "hi");

        assert!(matches!(
            args.value::<bool>(),
            Err(InvokeError::MissingArgument { method: "heal", index: 4 })
        ));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let mut args = Args::new(&HEAL, vec![true.into(), 5.into(), ArgValue::custom(1u8)]);

        assert!(matches!(
            args.value::<i32>(),
            Err(InvokeError::ArgumentMismatch {
                index: 0,
                expected: ArgumentKind::Int,
                ..
            })
        ));
        assert!(matches!(
            args.enumeration::<Side>(),
            Err(InvokeError::ArgumentMismatch {
                index: 1,
                expected: ArgumentKind::Enum,
                ..
            })
        ));
        assert!(args.custom::<u16>().is_err());
    }
}
