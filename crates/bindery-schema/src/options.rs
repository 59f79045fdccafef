use crate::prelude::*;

/// Default minimum number of candidates for a `match` dispatch.
pub const DEFAULT_BRANCH_THRESHOLD: usize = 3;

///
/// Options
///
/// Knobs for one compiler run.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Options {
    /// Path under which declared namespaces live in the consuming crate.
    pub root_path: String,

    /// Path of the runtime crate as seen from generated code.
    pub runtime_path: String,

    /// Dispatch and push methods switch from an `if` chain to a `match` at
    /// this many candidates.
    pub branch_threshold: usize,

    /// Prefix every unit with a generated-file banner.
    pub header: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root_path: "crate".to_string(),
            runtime_path: "::bindery".to_string(),
            branch_threshold: DEFAULT_BRANCH_THRESHOLD,
            header: true,
        }
    }
}

impl Options {
    /// True when `count` candidates are dispatched with a `match`.
    #[must_use]
    pub const fn use_branch_table(&self, count: usize) -> bool {
        count >= self.branch_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        let options = Options::default();
        assert!(!options.use_branch_table(2));
        assert!(options.use_branch_table(3));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let options: Options = serde_json::from_str(r#"{ "branch_threshold": 5 }"#).expect("options");
        assert_eq!(options.branch_threshold, 5);
        assert_eq!(options.root_path, "crate");
        assert_eq!(options.runtime_path, "::bindery");
        assert!(options.header);
    }
}
