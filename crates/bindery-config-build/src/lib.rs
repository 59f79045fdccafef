//! `bindery.toml` manifest loading.
//!
//! A manifest carries the compiler [`Options`] and the program to compile:
//!
//! ```toml
//! [options]
//! branch_threshold = 3
//!
//! [[enums]]
//! name = "Class"
//! namespace = "game"
//! values = [{ name = "Warrior", value = 0 }, { name = "Mage", value = 1 }]
//!
//! [[types]]
//! name = "Player"
//! namespace = "game"
//! partial = true
//! attributes = [{ kind = "bindable", on_property_changed = true }]
//! fields = [{ name = "_health", ty = "i32" }]
//! ```

use bindery_schema::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Conventional manifest file name.
pub const MANIFEST_FILE: &str = "bindery.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

///
/// Manifest
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub options: Options,
    pub enums: Vec<EnumDecl>,
    pub types: Vec<TypeDecl>,
}

impl Manifest {
    /// Split into the run options and the program.
    #[must_use]
    pub fn into_parts(self) -> (Options, Program) {
        let program = Program {
            types: self.types,
            enums: self.enums,
        };

        (self.options, program)
    }
}

/// Read and parse the manifest at `path`.
pub fn load(path: &Path) -> Result<Manifest, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest = parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        types = manifest.types.len(),
        enums = manifest.enums.len(),
        "manifest loaded"
    );

    Ok(manifest)
}

/// Parse manifest text.
pub fn parse(text: &str) -> Result<Manifest, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        [options]
        branch_threshold = 4

        [[enums]]
        name = "Class"
        namespace = "game"
        values = [
            { name = "Warrior", value = 0 },
            { name = "Mage", value = 1, aliases = [{ locale = "en", text = "Mage" }] },
        ]

        [[types]]
        name = "Player"
        namespace = "game"
        partial = true
        attributes = [{ kind = "bindable", on_property_changed = true }]

        [[types.fields]]
        name = "_health"
        ty = "i32"
        attributes = [{ kind = "also_notify", target = "IsAlive" }]

        [[types.properties]]
        name = "IsAlive"
        ty = "bool"
    "#;

    #[test]
    fn parses_full_manifest() {
        let manifest = parse(MANIFEST).expect("manifest");
        let (options, program) = manifest.into_parts();

        assert_eq!(options.branch_threshold, 4);
        assert_eq!(options.root_path, "crate");

        let player = program.type_decl("game::Player").expect("player");
        assert_eq!(player.bindable(), Some(true));
        assert_eq!(player.fields[0].also_notify().collect::<Vec<_>>(), ["IsAlive"]);
        assert_eq!(
            player.properties[0].getter,
            Some(Accessibility::Public)
        );

        let class = program.enum_decl("game::Class").expect("class");
        assert_eq!(class.values[1].aliases[0].text, "Mage");
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest = parse("").expect("empty");

        assert!(manifest.types.is_empty());
        assert_eq!(manifest.options, Options::default());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(parse("[typo]\nx = 1").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load(Path::new("does/not/exist/bindery.toml")).expect_err("missing");

        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist"));
    }
}
