use std::collections::VecDeque;

/// Free-text prompts and yes/no confirmations shown to the user.
pub trait Prompter {
    /// Ask for a line of text. `None` means the user cancelled.
    fn ask(&mut self, message: &str, default: Option<&str>) -> Option<String>;

    fn confirm(&mut self, message: &str) -> bool;
}

/// Answers prompts from a preset list. Runs out to `None` / the
/// configured confirmation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    confirm: bool,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: impl Into<String>) -> Self {
        self.answers.push_back(Some(text.into()));
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn confirming(mut self, yes: bool) -> Self {
        self.confirm = yes;
        self
    }

    /// Every message shown so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str, _default: Option<&str>) -> Option<String> {
        self.asked.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirm
    }
}
