//! Event-call analysis.
//!
//! Types carrying `event_register` expose their `event_call` methods to the
//! host by event name. The pass mirrors the binding one on a smaller scale:
//! structural checks, argument classification, then ancestor linking.

use crate::{
    diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink},
    extract::classify,
    prelude::*,
    scan::{ScanError, base_chain, embedded_chain, generation_mode},
};
use std::collections::{BTreeMap, BTreeSet};

// generic containers that cannot cross the event boundary
const COLLECTIONS: &[&str] = &[
    "BTreeMap",
    "BTreeSet",
    "Dictionary",
    "HashMap",
    "HashSet",
    "List",
    "Vec",
    "VecDeque",
];

/// Describe every eligible event-register type, ancestors first.
pub fn scan_event_types(
    program: &Program,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<EventTypeDescriptor>, ScanError> {
    // Phase 1: eligible types and their calls
    let mut eligible: BTreeMap<String, EventTypeDescriptor> = BTreeMap::new();
    for decl in program.types.iter().filter(|d| d.event_register()) {
        let (_, chain) = base_chain(program, decl)?;
        if !check_structure(decl, sink) {
            continue;
        }

        let ty = EventTypeDescriptor {
            full_name: decl.full_name(),
            simple_name: decl.name.clone(),
            namespace: decl.namespace.clone().filter(|ns| !ns.is_empty()),
            is_sealed: decl.sealed || decl.is_value_type(),
            base_type_chain: chain,
            register_ancestor_depth: None,
            calls: extract_calls(program, decl, sink),
        };

        tracing::trace!(type_name = %ty.full_name, calls = ty.calls.len(), "event type accepted");
        eligible.insert(ty.full_name.clone(), ty);
    }

    // Phase 2: link registering ancestors
    let registering: BTreeSet<String> = eligible.keys().cloned().collect();
    for ty in eligible.values_mut() {
        embedded_chain(program, &mut ty.base_type_chain);
        ty.register_ancestor_depth = ty
            .base_type_chain
            .iter()
            .position(|name| registering.contains(name))
            .map(|i| i + 1);
    }

    // Phase 3: ancestor-before-descendant order
    let mut ordered: Vec<EventTypeDescriptor> = eligible.into_values().collect();
    ordered.sort_by_cached_key(|t| {
        let depth = t
            .base_type_chain
            .iter()
            .filter(|name| registering.contains(*name))
            .count();

        (depth, t.full_name.clone())
    });

    tracing::debug!(types = ordered.len(), "event scan complete");

    Ok(ordered)
}

// check_structure
// a type also generated for binding was already checked by the binding scan
fn check_structure(decl: &TypeDecl, sink: &mut dyn DiagnosticSink) -> bool {
    let reported = generation_mode(decl).is_some();
    let full_name = decl.full_name();
    let mut ok = true;
    let mut reject = |code, message: String| {
        if !reported {
            sink.report(Diagnostic::new(code, &full_name, message));
        }
        ok = false;
    };

    if !decl.partial {
        reject(
            DiagnosticCode::NotPartial,
            format!("'{}' must be declared partial", decl.name),
        );
    }

    if let Some(parent) = &decl.parent {
        reject(
            DiagnosticCode::NestedType,
            format!("'{}' is nested in '{parent}'", decl.name),
        );
    }

    ok
}

fn extract_calls(
    program: &Program,
    decl: &TypeDecl,
    sink: &mut dyn DiagnosticSink,
) -> Vec<EventCallDescriptor> {
    let full_name = decl.full_name();
    let mut calls: Vec<EventCallDescriptor> = Vec::new();

    for method in &decl.methods {
        let Some((event_name, views)) = method.event_call() else {
            continue;
        };

        let Some(arguments) = exposable_arguments(program, decl.namespace.as_deref(), method)
        else {
            tracing::trace!(type_name = %full_name, method = %method.name, "method cannot be exposed");
            continue;
        };

        if calls.iter().any(|c| c.method_name == method.name) {
            sink.report(Diagnostic::new(
                DiagnosticCode::DuplicateEventCall,
                &full_name,
                format!("'{}' is exposed more than once", method.name),
            ));
            continue;
        }

        let event_name = event_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&method.name);

        calls.push(EventCallDescriptor {
            method_name: method.name.clone(),
            event_name: event_name.to_string(),
            views: views.to_vec(),
            is_static: method.is_static,
            returns: method
                .returns
                .as_deref()
                .map(str::trim)
                .filter(|ty| !ty.is_empty() && *ty != "()")
                .map(ToString::to_string),
            arguments,
        });
    }

    calls
}

// exposable_arguments
// None when the method is generic, async, or takes an argument the host
// cannot supply
fn exposable_arguments(
    program: &Program,
    namespace: Option<&str>,
    method: &MethodDecl,
) -> Option<Vec<ArgumentDescriptor>> {
    if method.is_generic || method.is_async {
        return None;
    }

    method
        .args
        .iter()
        .map(|arg| {
            if matches!(arg.modifier, ArgModifier::Out | ArgModifier::Params) {
                return None;
            }

            let (kind, type_full_name, enum_name) = classify_argument(program, namespace, &arg.ty);
            kind.is_supported().then(|| ArgumentDescriptor {
                name: arg.name.clone(),
                declared_type: arg.ty.clone(),
                type_full_name,
                kind,
                enum_name,
                by_ref: arg.modifier == ArgModifier::Ref,
            })
        })
        .collect()
}

/// Classify an argument type written inside `namespace`.
#[must_use]
pub fn classify_argument(
    program: &Program,
    namespace: Option<&str>,
    ty: &str,
) -> (ArgumentKind, String, Option<String>) {
    let class = classify(program, namespace, ty);

    let kind = match class.category {
        ValueCategory::Bool => ArgumentKind::Bool,
        ValueCategory::Enum | ValueCategory::FlagsEnum => ArgumentKind::Enum,
        ValueCategory::Float => ArgumentKind::Float,
        ValueCategory::Int => ArgumentKind::Int,
        ValueCategory::Sprite => ArgumentKind::Sprite,
        ValueCategory::String => ArgumentKind::String,
        ValueCategory::Unsupported if is_custom(&class.type_full_name) => ArgumentKind::Custom,
        _ => ArgumentKind::Unsupported,
    };

    (kind, class.type_full_name, class.enum_name)
}

fn is_custom(ty: &str) -> bool {
    if ty.is_empty() || ty.starts_with('&') || ty.starts_with("impl") || ty.starts_with("dyn") {
        return false;
    }

    if ty.starts_with("std::collections::") {
        return false;
    }

    let head = ty.split('<').next().unwrap_or(ty);
    let last = head.rsplit("::").next().unwrap_or(head);

    !COLLECTIONS.contains(&last)
}
