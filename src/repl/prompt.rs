//! Prompt for the document browser

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Prompt showing the name of the browsed document
pub struct BrowserPrompt {
    /// Document label, usually the file name
    label: String,
}

impl BrowserPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `label` - Document label shown before `>`
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Prompt for BrowserPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if self.label.is_empty() {
            "> ".into()
        } else {
            format!("{}> ", self.label).into()
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
