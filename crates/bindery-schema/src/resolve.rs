use crate::{
    diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink},
    extract::classify,
    prelude::*,
};
use std::collections::{BTreeMap, BTreeSet};

/// Fill `merged_properties` for every type. `types` must be ordered
/// ancestor-before-descendant so merged ancestor lists are complete when a
/// descendant reads them.
pub fn resolve(program: &Program, types: &mut [TypeDescriptor], sink: &mut dyn DiagnosticSink) {
    let mut done: BTreeMap<String, Vec<PropertyDescriptor>> = BTreeMap::new();

    for ty in types.iter_mut() {
        let mut merged = match ty.mode {
            GenerationMode::Bindable => merge(program, ty, &done),
            GenerationMode::AutoNotify => ty.accessor_properties().cloned().collect(),
        };

        check_also_notify(ty, &mut merged, sink);

        tracing::debug!(
            type_name = %ty.full_name,
            own = ty.own_properties.len(),
            merged = merged.len(),
            "properties merged"
        );

        ty.merged_properties = merged;
        done.insert(ty.full_name.clone(), ty.merged_properties.clone());
    }
}

fn merge(
    program: &Program,
    ty: &TypeDescriptor,
    done: &BTreeMap<String, Vec<PropertyDescriptor>>,
) -> Vec<PropertyDescriptor> {
    let mut merged: Vec<PropertyDescriptor> = ty.accessor_properties().cloned().collect();
    let mut names: BTreeSet<String> = merged.iter().map(|p| p.property_name.clone()).collect();

    // (a) hand-written properties, the type itself first, then each ancestor
    let owners = std::iter::once(&ty.full_name).chain(&ty.base_type_chain);
    for (depth, owner) in owners.enumerate() {
        let Some(decl) = program.type_decl(owner) else {
            continue;
        };
        let origin = if depth == 0 {
            PropertyOrigin::Declared
        } else {
            PropertyOrigin::Ancestor
        };

        for prop in &decl.properties {
            if !prop.getter.is_some_and(Accessibility::is_externally_visible) {
                continue;
            }
            if names.contains(&prop.name) {
                continue;
            }

            let class = classify(program, decl.namespace.as_deref(), &prop.ty);
            if !class.category.is_supported() {
                continue;
            }

            names.insert(prop.name.clone());
            merged.push(PropertyDescriptor {
                field_name: None,
                property_name: prop.name.clone(),
                category: class.category,
                declared_type: prop.ty.clone(),
                type_full_name: class.type_full_name,
                enum_name: class.enum_name,
                origin,
                declaring_type: owner.clone(),
                also_notify: Vec::new(),
                injected: InjectedCode::default(),
                suppress_notify: false,
                getter_fn: prop.getter_fn.clone(),
                doc: None,
            });
        }
    }

    // (b) merged lists of processed ancestors
    for owner in &ty.base_type_chain {
        let Some(inherited) = done.get(owner) else {
            continue;
        };

        for prop in inherited {
            if names.insert(prop.property_name.clone()) {
                merged.push(prop.inherited());
            }
        }
    }

    merged
}

// check_also_notify
// drops targets that name no merged property, on the own list and its copy
fn check_also_notify(
    ty: &mut TypeDescriptor,
    merged: &mut [PropertyDescriptor],
    sink: &mut dyn DiagnosticSink,
) {
    let known: BTreeSet<String> = merged.iter().map(|p| p.property_name.clone()).collect();

    for own in &mut ty.own_properties {
        own.also_notify.retain(|target| {
            let ok = known.contains(target);
            if !ok {
                sink.report(Diagnostic::new(
                    DiagnosticCode::UnknownAlsoNotifyTarget,
                    &ty.full_name,
                    format!(
                        "'{}' also notifies unknown property '{target}'",
                        own.property_name
                    ),
                ));
            }

            ok
        });
    }

    for entry in merged
        .iter_mut()
        .filter(|p| p.origin == PropertyOrigin::Field)
    {
        if let Some(own) = ty
            .own_properties
            .iter()
            .find(|p| p.property_name == entry.property_name)
        {
            entry.also_notify.clone_from(&own.also_notify);
        }
    }
}
