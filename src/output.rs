//! Machine-readable output for `--json`.

use crate::form::{FieldError, FormState};
use crate::synth::{GeneratedCommand, GenerationMode};
use serde::Serialize;

/// Result of one generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// The form validated and a command was produced.
    Generated {
        mode: GenerationMode,
        command: GeneratedCommand,
        form: FormState,
    },
    /// The form did not validate.
    Invalid { errors: Vec<FieldErrorReport> },
}

/// A field error with its rendered message.
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorReport {
    #[serde(flatten)]
    pub error: FieldError,
    pub message: String,
}

impl Output {
    pub fn generated(mode: GenerationMode, command: GeneratedCommand, form: FormState) -> Self {
        Output::Generated {
            mode,
            command,
            form,
        }
    }

    pub fn invalid(errors: &[FieldError]) -> Self {
        Output::Invalid {
            errors: errors
                .iter()
                .map(|error| FieldErrorReport {
                    error: error.clone(),
                    message: error.display_message(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
