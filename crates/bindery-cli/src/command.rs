use anyhow::{Context, bail};
use bindery::{
    build, config,
    schema::{
        diagnostic::Diagnostic,
        node::{EventTypeDescriptor, TypeDescriptor},
        registry::EnumRegistry,
        session::Session,
    },
};
use serde::Serialize;
use std::{path::Path, process::ExitCode};

pub fn generate(manifest: &Path, out: &Path) -> anyhow::Result<ExitCode> {
    let (options, program) = config::load(manifest)?.into_parts();
    let output = build::generate(&program, options)
        .with_context(|| format!("cannot analyse '{}'", manifest.display()))?;

    report(&output.diagnostics);
    for omitted in &output.omitted {
        eprintln!("warning: '{}' omitted: {}", omitted.type_name, omitted.error);
    }

    let written = output.write_to(out)?;
    tracing::info!(dir = %out.display(), files = written.len(), "bindings written");

    println!(
        "{} units, {} event units, {} indexes -> {}",
        output.units.len(),
        output.event_units.len(),
        output.indexes.len(),
        out.display()
    );

    Ok(ExitCode::SUCCESS)
}

pub fn check(manifest: &Path) -> anyhow::Result<ExitCode> {
    let (options, program) = config::load(manifest)?.into_parts();
    let session = Session::analyze(&program, options)?;

    report(session.diagnostics().items());
    println!(
        "{} bindable types, {} event types, {} enums, {} diagnostics",
        session.types().len(),
        session.event_types().len(),
        session.enums().len(),
        session.diagnostics().items().len()
    );

    if session.diagnostics().has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

///
/// Report
///

#[derive(Serialize)]
struct Report<'a> {
    types: Vec<&'a TypeDescriptor>,
    event_types: Vec<&'a EventTypeDescriptor>,
    enums: &'a EnumRegistry,
    diagnostics: &'a [Diagnostic],
}

pub fn inspect(manifest: &Path, type_name: Option<&str>) -> anyhow::Result<ExitCode> {
    let (options, program) = config::load(manifest)?.into_parts();
    let session = Session::analyze(&program, options)?;

    let (types, event_types): (Vec<_>, Vec<_>) = match type_name {
        Some(name) => {
            let types: Vec<_> = session.type_descriptor(name).into_iter().collect();
            let event_types: Vec<_> = session
                .event_types()
                .iter()
                .filter(|t| t.full_name == name)
                .collect();

            if types.is_empty() && event_types.is_empty() {
                bail!("no generated type named '{name}'");
            }

            (types, event_types)
        }
        None => (
            session.types().iter().collect(),
            session.event_types().iter().collect(),
        ),
    };

    let report = Report {
        types,
        event_types,
        enums: session.enums(),
        diagnostics: session.diagnostics().items(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(ExitCode::SUCCESS)
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}
