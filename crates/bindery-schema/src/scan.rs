use crate::{
    ThisError,
    diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink},
    prelude::*,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ScanError
///
/// Failures that leave no usable type map.
///

#[derive(Debug, ThisError)]
pub enum ScanError {
    #[error("base chain of '{0}' is cyclic")]
    CyclicBase(String),

    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),
}

/// Build the descriptor of every eligible type, ancestors before
/// descendants. Ineligible annotated types are reported to `sink` and left
/// out.
pub fn scan(
    program: &Program,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<TypeDescriptor>, ScanError> {
    // Phase 1: index every declaration by full name
    let mut index: BTreeMap<String, &TypeDecl> = BTreeMap::new();
    for decl in &program.types {
        let full_name = decl.full_name();
        if index.insert(full_name.clone(), decl).is_some() {
            return Err(ScanError::DuplicateType(full_name));
        }
    }

    // Phase 2: structural checks and base chains
    let mut eligible: BTreeMap<String, TypeDescriptor> = BTreeMap::new();
    for (full_name, decl) in &index {
        let Some(mode) = generation_mode(decl) else {
            continue;
        };

        let (base, chain) = base_chain(program, decl)?;
        if !check_structure(decl, mode, &chain, &index, sink) {
            continue;
        }

        tracing::trace!(type_name = %full_name, %mode, "type accepted");
        eligible.insert(full_name.clone(), new_descriptor(decl, mode, base, chain));
    }

    // Phase 3: link processed ancestors; auto-notify types implement the
    // binding contract too
    let processed: BTreeMap<String, bool> = eligible
        .values()
        .map(|t| (t.full_name.clone(), t.use_change_event))
        .collect();

    for ty in eligible.values_mut() {
        if ty.mode != GenerationMode::Bindable {
            continue;
        }

        embedded_chain(program, &mut ty.base_type_chain);
        ty.bindable_ancestor_depth = ty
            .base_type_chain
            .iter()
            .position(|name| processed.contains_key(name))
            .map(|i| i + 1);
        ty.ancestor_already_implements = ty.bindable_ancestor_depth.is_some();
        ty.ancestor_declared_change_event = ty
            .base_type_chain
            .iter()
            .any(|name| processed.get(name).copied().unwrap_or(false));
    }

    // Phase 4: ancestor-before-descendant order
    let mut ordered: Vec<TypeDescriptor> = eligible.into_values().collect();
    ordered.sort_by_cached_key(|t| {
        let depth = t
            .base_type_chain
            .iter()
            .filter(|name| processed.contains_key(*name))
            .count();

        (depth, t.full_name.clone())
    });

    tracing::debug!(types = ordered.len(), "scan complete");

    Ok(ordered)
}

// generation_mode
// None for types that carry no binding annotation at all
pub(crate) fn generation_mode(decl: &TypeDecl) -> Option<GenerationMode> {
    if decl.bindable().is_some() {
        Some(GenerationMode::Bindable)
    } else if decl.has_auto_notify_fields() {
        Some(GenerationMode::AutoNotify)
    } else {
        None
    }
}

// base_chain
// resolves the written base and walks class ancestors known to the program
pub(crate) fn base_chain(
    program: &Program,
    decl: &TypeDecl,
) -> Result<(Option<String>, Vec<String>), ScanError> {
    let full_name = decl.full_name();
    let Some(written) = decl.base.as_deref() else {
        return Ok((None, Vec::new()));
    };

    let mut visited = BTreeSet::from([full_name.clone()]);
    let mut chain = Vec::new();
    let mut namespace = decl.namespace.clone();
    let mut next = Some(written.to_string());

    while let Some(name) = next.take() {
        let Some(ancestor) = program.resolve_type(namespace.as_deref(), &name) else {
            break;
        };
        if ancestor.kind != TypeKind::Class {
            break;
        }

        let ancestor_name = ancestor.full_name();
        if !visited.insert(ancestor_name.clone()) {
            return Err(ScanError::CyclicBase(full_name));
        }

        chain.push(ancestor_name);
        namespace.clone_from(&ancestor.namespace);
        next.clone_from(&ancestor.base);
    }

    let base = chain
        .first()
        .cloned()
        .unwrap_or_else(|| written.trim().to_string());

    Ok((Some(base), chain))
}

// embedded_chain
// generated auto-notify structs embed no base, so the reachable chain ends there
pub(crate) fn embedded_chain(program: &Program, chain: &mut Vec<String>) {
    let flat = chain.iter().position(|name| {
        program
            .type_decl(name)
            .is_some_and(|decl| generation_mode(decl) == Some(GenerationMode::AutoNotify))
    });

    if let Some(i) = flat {
        chain.truncate(i + 1);
    }
}

// check_structure
// reports every violation, returns false if there was one
fn check_structure(
    decl: &TypeDecl,
    mode: GenerationMode,
    chain: &[String],
    index: &BTreeMap<String, &TypeDecl>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let full_name = decl.full_name();
    let mut ok = true;
    let mut reject = |code, message: String| {
        sink.report(Diagnostic::new(code, &full_name, message));
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

    let allowed = match mode {
        GenerationMode::Bindable => matches!(
            decl.accessibility,
            Accessibility::Public | Accessibility::Internal
        ),
        GenerationMode::AutoNotify => decl.accessibility == Accessibility::Public,
    };
    if !allowed {
        reject(
            DiagnosticCode::AccessibilityNotAllowed,
            format!("'{}' is {}", decl.name, decl.accessibility),
        );
    }

    if mode == GenerationMode::Bindable
        && let Some(base) = &decl.base
    {
        if decl.is_value_type() {
            reject(
                DiagnosticCode::IllegalBase,
                format!("struct '{}' cannot derive from '{base}'", decl.name),
            );
        }

        if let Some(direct) = chain.first()
            && index.get(direct).is_some_and(|b| b.sealed)
        {
            reject(
                DiagnosticCode::IllegalBase,
                format!("'{}' derives from sealed '{direct}'", decl.name),
            );
        }
    }

    ok
}

fn new_descriptor(
    decl: &TypeDecl,
    mode: GenerationMode,
    base: Option<String>,
    chain: Vec<String>,
) -> TypeDescriptor {
    let (base, chain) = match mode {
        GenerationMode::Bindable => (base, chain),
        GenerationMode::AutoNotify => (None, Vec::new()),
    };

    TypeDescriptor {
        full_name: decl.full_name(),
        simple_name: decl.name.clone(),
        namespace: decl.namespace.clone().filter(|ns| !ns.is_empty()),
        mode,
        accessibility: decl.accessibility,
        is_value_type: decl.is_value_type(),
        is_sealed: decl.sealed || decl.is_value_type(),
        base,
        base_type_chain: chain,
        bindable_ancestor_depth: None,
        ancestor_already_implements: false,
        ancestor_declared_change_event: false,
        use_change_event: decl.bindable().unwrap_or(false),
        fields: Vec::new(),
        own_properties: Vec::new(),
        merged_properties: Vec::new(),
        derives: decl.derives.clone(),
        doc: decl.doc.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;

    fn bindable(name: &str, base: Option<&str>) -> TypeDecl {
        TypeDecl {
            name: name.into(),
            namespace: Some("game".into()),
            partial: true,
            base: base.map(Into::into),
            attributes: vec![TypeAttribute::Bindable {
                on_property_changed: false,
            }],
            ..TypeDecl::default()
        }
    }

    fn names(types: &[TypeDescriptor]) -> Vec<&str> {
        types.iter().map(|t| t.full_name.as_str()).collect()
    }

    #[test]
    fn ancestors_come_first() {
        let program = Program {
            types: vec![
                bindable("Archer", Some("Hero")),
                bindable("Hero", Some("Actor")),
                bindable("Actor", None),
                bindable("Zone", None),
            ],
            enums: vec![],
        };

        let mut sink = Diagnostics::new();
        let types = scan(&program, &mut sink).expect("scan");

        assert_eq!(
            names(&types),
            ["game::Actor", "game::Zone", "game::Hero", "game::Archer"]
        );

        let archer = &types[3];
        assert_eq!(archer.base_type_chain, ["game::Hero", "game::Actor"]);
        assert_eq!(archer.bindable_ancestor_depth, Some(1));
        assert!(archer.ancestor_already_implements);
        assert!(sink.is_empty());
    }

    #[test]
    fn plain_ancestor_between_processed_types() {
        let mut plain = bindable("Mob", Some("Actor"));
        plain.attributes.clear();

        let program = Program {
            types: vec![bindable("Actor", None), plain, bindable("Orc", Some("Mob"))],
            enums: vec![],
        };

        let types = scan(&program, &mut Diagnostics::new()).expect("scan");
        let orc = types.iter().find(|t| t.simple_name == "Orc").expect("Orc");

        assert_eq!(orc.base.as_deref(), Some("game::Mob"));
        assert_eq!(orc.bindable_ancestor_depth, Some(2));
        assert_eq!(names(&types), ["game::Actor", "game::Orc"]);
    }

    #[test]
    fn auto_notify_ancestor_implements_the_contract() {
        let counter = TypeDecl {
            name: "Counter".into(),
            namespace: Some("game".into()),
            partial: true,
            base: Some("Actor".into()),
            fields: vec![FieldDecl {
                name: "_count".into(),
                ty: "i32".into(),
                attributes: vec![FieldAttribute::AutoNotify {
                    property_name: None,
                }],
                doc: None,
            }],
            ..TypeDecl::default()
        };

        let program = Program {
            types: vec![bindable("Actor", None), counter, bindable("Tally", Some("Counter"))],
            enums: vec![],
        };

        let types = scan(&program, &mut Diagnostics::new()).expect("scan");
        let tally = types.iter().find(|t| t.simple_name == "Tally").expect("Tally");

        // Counter embeds no base, so Actor is out of reach
        assert_eq!(tally.base_type_chain, ["game::Counter"]);
        assert_eq!(tally.bindable_ancestor_depth, Some(1));
        assert_eq!(tally.method_kind(), MethodKind::Refinement);
        assert!(!tally.ancestor_declared_change_event);
        assert_eq!(names(&types), ["game::Actor", "game::Counter", "game::Tally"]);
    }

    #[test]
    fn change_event_of_an_ancestor_is_tracked() {
        let mut root = bindable("Root", None);
        root.attributes = vec![TypeAttribute::Bindable {
            on_property_changed: true,
        }];

        let program = Program {
            types: vec![root, bindable("Leaf", Some("Root"))],
            enums: vec![],
        };

        let types = scan(&program, &mut Diagnostics::new()).expect("scan");
        assert!(!types[0].ancestor_declared_change_event);
        assert!(types[1].ancestor_declared_change_event);
    }

    #[test]
    fn unknown_base_is_kept_verbatim() {
        let program = Program {
            types: vec![bindable("Widget", Some("ext::Panel"))],
            enums: vec![],
        };

        let types = scan(&program, &mut Diagnostics::new()).expect("scan");
        assert_eq!(types[0].base.as_deref(), Some("ext::Panel"));
        assert!(types[0].base_type_chain.is_empty());
        assert!(!types[0].ancestor_already_implements);
    }

    #[test]
    fn structural_violations_are_reported_and_excluded() {
        let mut not_partial = bindable("Loose", None);
        not_partial.partial = false;

        let mut nested = bindable("Inner", None);
        nested.parent = Some("Outer".into());

        let mut private = bindable("Hidden", None);
        private.accessibility = Accessibility::Private;

        let mut value_with_base = bindable("Point", Some("Loose"));
        value_with_base.kind = TypeKind::Struct;

        let mut sealed = bindable("Final", None);
        sealed.sealed = true;

        let program = Program {
            types: vec![
                not_partial,
                nested,
                private,
                value_with_base,
                sealed,
                bindable("AfterFinal", Some("Final")),
            ],
            enums: vec![],
        };

        let mut sink = Diagnostics::new();
        let types = scan(&program, &mut sink).expect("scan");

        assert_eq!(names(&types), ["game::Final"]);
        for code in [
            DiagnosticCode::NotPartial,
            DiagnosticCode::NestedType,
            DiagnosticCode::AccessibilityNotAllowed,
        ] {
            assert_eq!(sink.with_code(code).count(), 1, "{code}");
        }
        assert_eq!(sink.with_code(DiagnosticCode::IllegalBase).count(), 2);
    }

    #[test]
    fn auto_notify_requires_public() {
        let counter = TypeDecl {
            name: "Counter".into(),
            partial: true,
            accessibility: Accessibility::Internal,
            fields: vec![FieldDecl {
                name: "_count".into(),
                ty: "i32".into(),
                attributes: vec![FieldAttribute::AutoNotify {
                    property_name: None,
                }],
                doc: None,
            }],
            ..TypeDecl::default()
        };

        let mut sink = Diagnostics::new();
        let types = scan(
            &Program {
                types: vec![counter],
                enums: vec![],
            },
            &mut sink,
        )
        .expect("scan");

        assert!(types.is_empty());
        assert_eq!(
            sink.with_code(DiagnosticCode::AccessibilityNotAllowed).count(),
            1
        );
    }

    #[test]
    fn duplicates_and_cycles_are_fatal() {
        let program = Program {
            types: vec![bindable("Twice", None), bindable("Twice", None)],
            enums: vec![],
        };
        assert!(matches!(
            scan(&program, &mut Diagnostics::new()),
            Err(ScanError::DuplicateType(name)) if name == "game::Twice"
        ));

        let program = Program {
            types: vec![bindable("A", Some("B")), bindable("B", Some("A"))],
            enums: vec![],
        };
        assert!(matches!(
            scan(&program, &mut Diagnostics::new()),
            Err(ScanError::CyclicBase(_))
        ));
    }
}
