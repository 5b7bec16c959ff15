//! Interactive prompts: confirmation, editor round-trip and fuzzy selection

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, FuzzySelect};
use log::debug;

use crate::error::{KwError, Result};

/// User interaction needed by the context commands.
///
/// Declining or aborting maps to [`KwError::Canceled`].
pub trait Prompter {
    /// Ask a yes/no question; `skip` answers yes without asking
    fn confirm(&self, skip: bool, message: &str) -> Result<()>;

    /// Open `initial` in an editor and return the saved content
    fn edit(&self, initial: &str) -> Result<String>;

    /// Pick one of `items`, returning its index
    fn select(&self, prompt: &str, items: &[String]) -> Result<usize>;
}

/// Prompter backed by the terminal
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    editor: String,
}

impl TerminalPrompter {
    pub fn new(editor: &str) -> Self {
        Self {
            editor: editor.to_string(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, skip: bool, message: &str) -> Result<()> {
        if skip {
            return Ok(());
        }
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact_opt()?;
        match answer {
            Some(true) => Ok(()),
            _ => Err(KwError::Canceled),
        }
    }

    fn edit(&self, initial: &str) -> Result<String> {
        debug!("Opening editor '{}'", self.editor);
        let edited = Editor::new()
            .executable(&self.editor)
            .extension(".yaml")
            .require_save(false)
            .trim_newlines(false)
            .edit(initial)
            .map_err(|e| KwError::ExternalTool {
                command: self.editor.clone(),
                detail: e.to_string(),
            })?
            .unwrap_or_default();
        check_edited(initial, edited)
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<usize> {
        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?;
        selection.ok_or(KwError::Canceled)
    }
}

/// Reject edits that leave the content as it was
pub(crate) fn check_edited(initial: &str, edited: String) -> Result<String> {
    if edited == initial {
        return Err(KwError::Conflict("edit content not changed".to_string()));
    }
    Ok(edited)
}
