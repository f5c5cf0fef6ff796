use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use leagues_core::Prompter;

/// Prompts on stderr, answers from stdin. Answers given as command-line
/// arguments are used first, and `--yes` confirms without asking.
#[derive(Default)]
pub struct TerminalPrompter {
    preset: VecDeque<Option<String>>,
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `answer` for the next prompt if it is set.
    pub fn preset(mut self, answer: Option<String>) -> Self {
        if answer.is_some() {
            self.preset.push_back(answer);
        }
        self
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn read_line() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        if let Some(answer) = self.preset.pop_front() {
            return answer;
        }
        match default {
            Some(d) => eprint!("{message} [{d}] "),
            None => eprint!("{message} "),
        }
        let _ = io::stderr().flush();
        let line = Self::read_line()?;
        match default {
            Some(d) if line.trim().is_empty() => Some(d.to_string()),
            _ => Some(line),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        matches!(
            Self::read_line().map(|l| l.trim().to_lowercase()).as_deref(),
            Some("y" | "yes")
        )
    }
}
