//! Build-script helper that compiles a `bindery.toml` manifest into
//! `$OUT_DIR/bindery`, where `include_bindings!` picks the units up.
//!
//! Expects to run inside a `main` returning
//! `Result<(), Box<dyn std::error::Error>>`.
#[macro_export]
macro_rules! build {
    () => {
        $crate::build!("bindery.toml")
    };
    ($manifest:expr) => {
        use std::{env::var, path::PathBuf};

        //
        // CARGO
        //

        let manifest_dir = var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
        let manifest = PathBuf::from(manifest_dir).join($manifest);

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", manifest.display());

        // Get the output directory set by Cargo
        let out_dir = var("OUT_DIR").expect("OUT_DIR not set");

        //
        // BINDINGS
        //

        let (options, program) = ::bindery::config::load(&manifest)?.into_parts();
        let output = ::bindery::build::generate(&program, options)?;

        for diagnostic in &output.diagnostics {
            println!("cargo:warning={diagnostic}");
        }
        for omitted in &output.omitted {
            println!(
                "cargo:warning=bindery: '{}' omitted: {}",
                omitted.type_name, omitted.error
            );
        }

        output.write_to(&PathBuf::from(out_dir).join("bindery"))?;
    };
}
