//! State of the command popup and its copy affordance.

use crate::clipboard::Clipboard;
use crate::synth::GeneratedCommand;
use tracing::{info, warn};

/// Shown when the clipboard cannot be written.
pub const MANUAL_COPY_MESSAGE: &str =
    "Failed to copy to clipboard. You will need to copy it manually.";

/// What the copy trigger currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    /// Trigger available, nothing copied yet.
    Ready,
    /// Last copy succeeded; trigger shows the confirmed indicator.
    Copied,
    /// A copy failed; trigger is hidden and the manual-copy message shown.
    Failed,
}

/// The dismissible surface showing the generated command.
#[derive(Debug, Clone)]
pub struct CommandDisplay {
    command: Option<GeneratedCommand>,
    is_open: bool,
    copy_state: CopyState,
}

impl Default for CommandDisplay {
    fn default() -> Self {
        Self {
            command: None,
            is_open: false,
            copy_state: CopyState::Ready,
        }
    }
}

impl CommandDisplay {
    /// Show `command`, replacing whatever was shown before.
    ///
    /// A previous confirmation is cleared. A previous failure is not: the
    /// clipboard is not retried for the rest of the session.
    pub fn open(&mut self, command: GeneratedCommand) {
        self.command = Some(command);
        self.is_open = true;
        if self.copy_state == CopyState::Copied {
            self.copy_state = CopyState::Ready;
        }
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn command(&self) -> Option<&GeneratedCommand> {
        self.command.as_ref()
    }

    pub fn copy_state(&self) -> CopyState {
        self.copy_state
    }

    /// Whether the copy trigger should be offered at all.
    pub fn shows_trigger(&self) -> bool {
        self.copy_state != CopyState::Failed
    }

    /// Copy the shown command. Does nothing once a copy has failed.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> CopyState {
        if self.copy_state == CopyState::Failed {
            return self.copy_state;
        }
        let Some(command) = &self.command else {
            return self.copy_state;
        };

        self.copy_state = match clipboard.write_text(command.as_str()) {
            Ok(()) => {
                info!("Command copied to clipboard");
                CopyState::Copied
            }
            Err(e) => {
                warn!("{}", e);
                CopyState::Failed
            }
        };
        self.copy_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use crate::form::FormDraft;
    use crate::synth::{synthesize, GenerationMode};

    fn command() -> GeneratedCommand {
        synthesize(
            GenerationMode::FlagBased,
            &FormDraft::default().submit().unwrap(),
        )
    }

    #[test]
    fn test_copy_success_confirms_until_reopened() {
        let mut display = CommandDisplay::default();
        let mut clipboard = MemoryClipboard::default();
        display.open(command());

        assert_eq!(display.copy(&mut clipboard), CopyState::Copied);
        assert_eq!(clipboard.contents.as_deref(), Some(command().as_str()));
        assert!(display.shows_trigger());

        display.close();
        assert_eq!(display.copy_state(), CopyState::Copied);

        display.open(command());
        assert_eq!(display.copy_state(), CopyState::Ready);
    }

    #[test]
    fn test_copy_failure_hides_trigger() {
        let mut display = CommandDisplay::default();
        display.open(command());

        assert_eq!(
            display.copy(&mut MemoryClipboard::failing()),
            CopyState::Failed
        );
        assert!(!display.shows_trigger());

        // No retry, even with a working clipboard.
        let mut clipboard = MemoryClipboard::default();
        display.close();
        display.open(command());
        assert_eq!(display.copy(&mut clipboard), CopyState::Failed);
        assert!(clipboard.contents.is_none());
    }

    #[test]
    fn test_open_replaces_command() {
        let mut display = CommandDisplay::default();
        assert!(!display.is_open());
        assert!(display.command().is_none());

        display.open(command());
        let mut draft = FormDraft::default();
        draft.view_folder = "Other".to_string();
        let next = synthesize(GenerationMode::FlagBased, &draft.submit().unwrap());
        display.open(next.clone());

        assert!(display.is_open());
        assert_eq!(display.command(), Some(&next));
    }

    #[test]
    fn test_copy_without_command_is_noop() {
        let mut display = CommandDisplay::default();
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(display.copy(&mut clipboard), CopyState::Ready);
        assert!(clipboard.contents.is_none());
    }
}
