use crate::{
    diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink},
    prelude::*,
    registry::{EnumDescriptor, EnumRegistry},
};

///
/// Classified
///
/// Result of classifying a declared type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Classified {
    pub category: ValueCategory,

    /// Normalised name recorded in metadata.
    pub type_full_name: String,

    /// Full name of the referenced enum, for enum categories.
    pub enum_name: Option<String>,
}

impl Classified {
    fn unsupported(ty: &str) -> Self {
        Self {
            category: ValueCategory::Unsupported,
            type_full_name: ty.to_string(),
            enum_name: None,
        }
    }
}

/// Classify a declared type written inside `namespace`.
#[must_use]
pub fn classify(program: &Program, namespace: Option<&str>, ty: &str) -> Classified {
    let ty: String = ty.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(inner) = list_element(&ty) {
        let element = classify_scalar(program, namespace, inner);

        return match element.category.list_of() {
            Some(category) => Classified {
                category,
                type_full_name: format!("Vec<{}>", element.type_full_name),
                enum_name: element.enum_name,
            },
            None => Classified::unsupported(&ty),
        };
    }

    classify_scalar(program, namespace, &ty)
}

fn list_element(ty: &str) -> Option<&str> {
    ["Vec<", "List<", "std::vec::Vec<"]
        .iter()
        .find_map(|prefix| ty.strip_prefix(prefix))
        .and_then(|rest| rest.strip_suffix('>'))
}

fn classify_scalar(program: &Program, namespace: Option<&str>, ty: &str) -> Classified {
    let (category, name) = match ty {
        "i32" | "int" => (ValueCategory::Int, "i32"),
        "f32" | "float" => (ValueCategory::Float, "f32"),
        "bool" => (ValueCategory::Bool, "bool"),
        "String" | "string" | "std::string::String" => (ValueCategory::String, "String"),
        "Sprite" | "bindery::Sprite" | "::bindery::Sprite" => {
            (ValueCategory::Sprite, "bindery::Sprite")
        }
        _ => {
            return match program.resolve_enum(namespace, ty) {
                Some(decl) => {
                    let full_name = decl.full_name();
                    Classified {
                        category: if decl.flags {
                            ValueCategory::FlagsEnum
                        } else {
                            ValueCategory::Enum
                        },
                        type_full_name: full_name.clone(),
                        enum_name: Some(full_name),
                    }
                }
                None => Classified::unsupported(ty),
            };
        }
    };

    Classified {
        category,
        type_full_name: name.to_string(),
        enum_name: None,
    }
}

/// Default public name for a field: drop one leading `_` or `m_`, then
/// uppercase the first character. `None` when nothing is left or the
/// result equals the field name.
#[must_use]
pub fn derive_property_name(field_name: &str) -> Option<String> {
    let stripped = field_name
        .strip_prefix("m_")
        .or_else(|| field_name.strip_prefix('_'))
        .unwrap_or(field_name);

    let mut chars = stripped.chars();
    let first = chars.next()?;
    let name: String = first.to_uppercase().chain(chars).collect();

    accept_name(field_name, name)
}

fn accept_name(field_name: &str, name: String) -> Option<String> {
    (!name.is_empty() && name != field_name).then_some(name)
}

/// Fill `fields` and `own_properties` of `ty`, registering referenced enums.
pub fn extract(
    program: &Program,
    decl: &TypeDecl,
    ty: &mut TypeDescriptor,
    registry: &mut EnumRegistry,
    sink: &mut dyn DiagnosticSink,
) {
    let namespace = ty.namespace.clone();

    for field in &decl.fields {
        let class = classify(program, namespace.as_deref(), &field.ty);

        ty.fields.push(FieldSlot {
            name: field.name.clone(),
            declared_type: field.ty.clone(),
            category: class.category,
            enum_name: class.enum_name.clone(),
            doc: field.doc.clone(),
        });

        if !class.category.is_supported() {
            tracing::trace!(type_name = %ty.full_name, field = %field.name, ty = %field.ty, "unsupported field skipped");
            continue;
        }

        let property = match ty.mode {
            GenerationMode::Bindable => bindable_property(field, &ty.full_name, class),
            GenerationMode::AutoNotify => auto_notify_property(field, &ty.full_name, class),
        };
        let Some(property) = property else {
            continue;
        };

        if ty
            .own_properties
            .iter()
            .any(|p| p.property_name == property.property_name)
        {
            sink.report(Diagnostic::new(
                DiagnosticCode::DuplicatePropertyName,
                &ty.full_name,
                format!(
                    "field '{}' maps to '{}', which an earlier field already uses",
                    field.name, property.property_name
                ),
            ));
            continue;
        }

        if !property.suppress_notify
            && let Some(enum_name) = &property.enum_name
            && !registry.contains(enum_name)
            && let Some(enum_decl) = program.enum_decl(enum_name)
        {
            registry.register(EnumDescriptor::from_decl(enum_decl));
        }

        tracing::trace!(
            type_name = %ty.full_name,
            field = %field.name,
            property = %property.property_name,
            category = %property.category,
            "property extracted"
        );
        ty.own_properties.push(property);
    }
}

fn bindable_property(
    field: &FieldDecl,
    declaring_type: &str,
    class: Classified,
) -> Option<PropertyDescriptor> {
    let name = match field.property_name() {
        Some(explicit) => accept_name(&field.name, explicit.trim().to_string()),
        None => derive_property_name(&field.name),
    };
    let Some(property_name) = name else {
        tracing::trace!(field = %field.name, "field dropped, no usable property name");
        return None;
    };

    let mut injected = InjectedCode::default();
    for (point, code) in field.code_injections() {
        injected.push(point, code);
    }

    Some(PropertyDescriptor {
        field_name: Some(field.name.clone()),
        property_name,
        category: class.category,
        declared_type: field.ty.clone(),
        type_full_name: class.type_full_name,
        enum_name: class.enum_name,
        origin: PropertyOrigin::Field,
        declaring_type: declaring_type.to_string(),
        also_notify: field.also_notify().map(ToString::to_string).collect(),
        injected,
        suppress_notify: field.dont_notify(),
        getter_fn: None,
        doc: field.doc.clone(),
    })
}

fn auto_notify_property(
    field: &FieldDecl,
    declaring_type: &str,
    class: Classified,
) -> Option<PropertyDescriptor> {
    if !field.auto_notify() {
        return None;
    }

    let name = match field.auto_notify_name() {
        Some(explicit) => accept_name(&field.name, explicit.trim().to_string()),
        None => derive_property_name(&field.name),
    }?;

    Some(PropertyDescriptor {
        field_name: Some(field.name.clone()),
        property_name: name,
        category: class.category,
        declared_type: field.ty.clone(),
        type_full_name: class.type_full_name,
        enum_name: class.enum_name,
        origin: PropertyOrigin::Field,
        declaring_type: declaring_type.to_string(),
        also_notify: Vec::new(),
        injected: InjectedCode::default(),
        suppress_notify: false,
        getter_fn: None,
        doc: field.doc.clone(),
    })
}
