use crate::{
    call::{ArgValue, EventCall, InvokeError},
    enums::EnumInfo,
    model::BindableTypeInfo,
    value::PropertyValue,
};
use std::any::Any;

///
/// BindableModel
///
/// The binding contract. Generated code implements it for every bindable
/// type; types that embed a bindable base forward each call to the base
/// before handling their own properties.
///

pub trait BindableModel {
    /// Static metadata for the concrete type.
    fn type_info(&self) -> &'static BindableTypeInfo;

    /// Assign an int-like property (ints and enums) by name.
    fn update_int(&mut self, property_name: &str, value: i32);

    fn update_float(&mut self, property_name: &str, value: f32);

    fn update_string(&mut self, property_name: &str, value: &str);

    fn update_bool(&mut self, property_name: &str, value: bool);

    /// Forward every own property's current value to `sink`.
    fn push_all(&self, sink: &mut dyn ModelSink);

    /// Forward a single property's current value to `sink`.
    fn push_one(&self, property_name: &str, sink: &mut dyn ModelSink);

    /// Route a value to the matching category-specific update.
    ///
    /// List, sprite and list-of-enum values are push-only and are ignored.
    fn update_by_name(&mut self, property_name: &str, value: PropertyValue<'_>) {
        match value {
            PropertyValue::Int(v) => self.update_int(property_name, v),
            PropertyValue::Float(v) => self.update_float(property_name, v),
            PropertyValue::Bool(v) => self.update_bool(property_name, v),
            PropertyValue::String(v) => self.update_string(property_name, &v),
            _ => {}
        }
    }
}

///
/// ModelSink
///
/// Receiver for pushed property values.
///

pub trait ModelSink {
    fn update_ui(&mut self, property_name: &str, value: PropertyValue<'_>);
}

impl ModelSink for Vec<(String, PropertyValue<'static>)> {
    fn update_ui(&mut self, property_name: &str, value: PropertyValue<'_>) {
        self.push((property_name.to_string(), value.into_owned()));
    }
}

///
/// BindableEnum
///
/// Integer round-trip for enums used as bindable properties. Implemented by
/// the compiler exactly once per enum type.
///

pub trait BindableEnum: Copy + Sized + 'static {
    /// Static descriptor; the first call also adds it to the process-wide
    /// registry.
    fn enum_info() -> &'static EnumInfo;

    fn to_int(self) -> i32;

    /// `None` when `value` does not name a declared variant.
    fn from_int(value: i32) -> Option<Self>;
}

/// Result of a successful invocation: the method's return value, boxed,
/// or `None` for methods without one.
pub type Invoked = Result<Option<Box<dyn Any>>, InvokeError>;

///
/// EventRegister
///
/// Event-call contract. Generated for types whose methods are exposed to the
/// host by event name; types that embed a registering base forward to it.
///

pub trait EventRegister {
    /// Append every event call of this type, the base's first.
    fn register_event_calls(&self, calls: &mut Vec<&'static EventCall>);

    /// Run the method `call` names. Calls declared on an ancestor are
    /// forwarded to the embedded base; unknown calls return `Ok(None)`.
    fn invoke(&mut self, call: &EventCall, args: Vec<ArgValue>) -> Invoked;

    fn event_calls(&self) -> Vec<&'static EventCall> {
        let mut calls = Vec::new();
        self.register_event_calls(&mut calls);

        calls
    }

    /// Invoke the first call named `event_name` that is shown in `view`.
    fn invoke_event(&mut self, event_name: &str, view: &str, args: Vec<ArgValue>) -> Invoked {
        let call = self
            .event_calls()
            .into_iter()
            .find(|c| c.event_name == event_name && c.shown_in(view))
            .ok_or_else(|| InvokeError::UnknownEvent(event_name.to_string()))?;

        self.invoke(call, args)
    }
}
