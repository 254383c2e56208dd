//! Form state: the editable draft and the validated snapshot.

use crate::config::FormDefaults;
use crate::options::OptionKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A text field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RootFolder,
    ProjectName,
    ViewFolder,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::RootFolder, Field::ProjectName, Field::ViewFolder];

    /// Heading shown above the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::RootFolder => "Root Folder",
            Field::ProjectName => "Parent Folder",
            Field::ViewFolder => "Component Name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Heading of the checkbox group.
pub const FORMATTING_LABEL: &str = "File";

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("{field} is required")]
    RequiredFieldMissing { field: Field },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::RequiredFieldMissing { field } => *field,
        }
    }

    /// Message as shown under the input: capitalized, with a full stop.
    pub fn display_message(&self) -> String {
        format!("{}.", capitalize_first(&self.to_string()))
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered set of selected file kinds.
///
/// Keeps the order keys were supplied in; a key is never present twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OptionKey>", into = "Vec<OptionKey>")]
pub struct Selection(Vec<OptionKey>);

impl Selection {
    pub fn all() -> Self {
        OptionKey::ALL.into_iter().collect()
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.0.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in supplied order.
    pub fn iter(&self) -> impl Iterator<Item = OptionKey> + '_ {
        self.0.iter().copied()
    }

    /// Selected keys in canonical order.
    pub fn canonical(&self) -> impl Iterator<Item = OptionKey> + '_ {
        OptionKey::ALL.into_iter().filter(|key| self.contains(*key))
    }

    /// Select `key` if absent (appending it), deselect it otherwise.
    pub fn toggle(&mut self, key: OptionKey) {
        if let Some(pos) = self.0.iter().position(|k| *k == key) {
            self.0.remove(pos);
        } else {
            self.0.push(key);
        }
    }
}

impl FromIterator<OptionKey> for Selection {
    fn from_iter<I: IntoIterator<Item = OptionKey>>(iter: I) -> Self {
        let mut keys = Vec::new();
        for key in iter {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Selection(keys)
    }
}

impl From<Vec<OptionKey>> for Selection {
    fn from(keys: Vec<OptionKey>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<Selection> for Vec<OptionKey> {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

/// Validated form values, fixed at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub root_folder: String,
    pub project_name: String,
    pub view_folder: String,
    pub formatting: Selection,
}

impl FormState {
    /// Last `/`-separated segment of the project name.
    pub fn project_leaf(&self) -> &str {
        self.project_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.project_name)
    }
}

/// Raw, unvalidated form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub root_folder: String,
    pub project_name: String,
    pub view_folder: String,
    pub formatting: Selection,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self::from_defaults(&FormDefaults::default())
    }
}

impl FormDraft {
    pub fn from_defaults(defaults: &FormDefaults) -> Self {
        Self {
            root_folder: defaults.root_folder.clone(),
            project_name: defaults.project_name.clone(),
            view_folder: defaults.view_folder.clone(),
            formatting: defaults.formatting.clone(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::RootFolder => &self.root_folder,
            Field::ProjectName => &self.project_name,
            Field::ViewFolder => &self.view_folder,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::RootFolder => self.root_folder = value,
            Field::ProjectName => self.project_name = value,
            Field::ViewFolder => self.view_folder = value,
        }
    }

    /// Validate the draft.
    ///
    /// Every blank text field produces its own error. Values that pass are
    /// kept verbatim.
    pub fn submit(&self) -> Result<FormState, Vec<FieldError>> {
        let errors: Vec<FieldError> = Field::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .map(|field| FieldError::RequiredFieldMissing { field })
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(FormState {
            root_folder: self.root_folder.clone(),
            project_name: self.project_name.clone(),
            view_folder: self.view_folder.clone(),
            formatting: self.formatting.clone(),
        })
    }
}
