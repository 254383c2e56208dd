//! Command synthesis.
//!
//! Turns a validated [`FormState`] into the one-line shell command shown to
//! the user. Two generator back ends are supported, selected by
//! [`GenerationMode`]. Interpolated values are not shell-quoted.

use crate::form::FormState;
use crate::options::OptionKey;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of command to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Invoke the `new-component` generator with short flags.
    #[default]
    FlagBased,
    /// Create the files directly with `mkdir` and `touch`.
    FilesystemScaffold,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::FlagBased => "flag-based",
            GenerationMode::FilesystemScaffold => "filesystem-scaffold",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shell-ready command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedCommand(String);

impl GeneratedCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the command for `form` in the given mode.
pub fn synthesize(mode: GenerationMode, form: &FormState) -> GeneratedCommand {
    let args = match mode {
        GenerationMode::FlagBased => flag_based_args(form),
        GenerationMode::FilesystemScaffold => scaffold_args(form),
    };
    GeneratedCommand(args.join(" "))
}

fn flag_based_args(form: &FormState) -> Vec<String> {
    let path = format!("{}/{}/views", form.root_folder, form.project_name);
    let mut args = vec![format!("new-component {} -d {}", form.view_folder, path)];

    let selected = &form.formatting;
    let schema_selected = selected.contains(OptionKey::Schema);

    // `-all` does not cover schema. A partial selection that includes schema
    // falls through to per-file flags.
    if !schema_selected && selected.len() >= 4 {
        args.push("-all".to_string());
    } else if schema_selected && selected.len() == OptionKey::ALL.len() {
        args.push("-all -s".to_string());
    } else {
        args.extend(
            selected
                .canonical()
                .filter_map(|key| key.option().value(GenerationMode::FlagBased))
                .map(|flag| format!("-{}", flag)),
        );
    }

    args
}

fn scaffold_args(form: &FormState) -> Vec<String> {
    let path = format!(
        "{}/{}/views/{}",
        form.root_folder, form.project_name, form.view_folder
    );
    let mut args = vec![
        format!("mkdir -p {} &&", path),
        format!("touch {}/index.tsx", path),
        format!("touch {}/{}.tsx", path, form.view_folder),
    ];

    args.extend(form.formatting.iter().filter_map(|key| {
        key.option()
            .value(GenerationMode::FilesystemScaffold)
            .map(|ext| format!("touch {}/{}.{}", path, form.view_folder, ext))
    }));

    // TODO: find out what consumes the trailing project segment before
    // dropping it.
    args.push(form.project_leaf().to_string());

    args
}
