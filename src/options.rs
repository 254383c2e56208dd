//! File kinds a user can select for generation.
//!
//! The lookup table is a `const` array indexed by [`OptionKey`], so it is
//! built at compile time and never mutated.

use crate::synth::GenerationMode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five boilerplate file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    Index,
    Constant,
    Hooks,
    Schema,
    Type,
}

impl OptionKey {
    /// Every key, in canonical order.
    pub const ALL: [OptionKey; 5] = [
        OptionKey::Index,
        OptionKey::Constant,
        OptionKey::Hooks,
        OptionKey::Schema,
        OptionKey::Type,
    ];

    /// Static table entry for this key.
    pub fn option(self) -> &'static FileKindOption {
        &OPTIONS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.option().key
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKindOption {
    pub key: &'static str,
    /// Short flag understood by `new-component`.
    pub flag: &'static str,
    /// Suffix appended to the component name when touching files directly.
    /// `index` has none: `index.tsx` is always created.
    pub extension: Option<&'static str>,
    /// Checkbox caption.
    pub label: &'static str,
}

impl FileKindOption {
    /// Token this option contributes in the given mode.
    pub fn value(&self, mode: GenerationMode) -> Option<&'static str> {
        match mode {
            GenerationMode::FlagBased => Some(self.flag),
            GenerationMode::FilesystemScaffold => self.extension,
        }
    }
}

const OPTIONS: [FileKindOption; 5] = [
    FileKindOption {
        key: "index",
        flag: "i",
        extension: None,
        label: "View",
    },
    FileKindOption {
        key: "constant",
        flag: "c",
        extension: Some("constants.ts"),
        label: "Constant",
    },
    FileKindOption {
        key: "hooks",
        flag: "h",
        extension: Some("hooks.ts"),
        label: "Hook",
    },
    FileKindOption {
        key: "schema",
        flag: "s",
        extension: Some("schemas.ts"),
        label: "Schema",
    },
    FileKindOption {
        key: "type",
        flag: "t",
        extension: Some("types.ts"),
        label: "Type",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_keys() {
        for key in OptionKey::ALL {
            assert_eq!(key.option().key, key.to_string());
        }
    }

    #[test]
    fn test_value_by_mode() {
        let hooks = OptionKey::Hooks.option();
        assert_eq!(hooks.value(GenerationMode::FlagBased), Some("h"));
        assert_eq!(
            hooks.value(GenerationMode::FilesystemScaffold),
            Some("hooks.ts")
        );
        assert_eq!(
            OptionKey::Index
                .option()
                .value(GenerationMode::FilesystemScaffold),
            None
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&OptionKey::ALL).unwrap();
        assert_eq!(json, r#"["index","constant","hooks","schema","type"]"#);
    }
}
