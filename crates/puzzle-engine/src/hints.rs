//! Progressive hint disclosure.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintReply {
    Hint {
        text: String,
        /// 1-based position of this hint.
        number: usize,
        remaining: usize,
    },
    /// Terminal signal, returned on every call once the list is used up.
    NoMoreHints,
}

#[derive(Debug, Clone, Default)]
pub struct HintProvider {
    hints: Vec<String>,
    revealed: usize,
}

impl HintProvider {
    pub fn new(hints: Vec<String>) -> Self {
        Self { hints, revealed: 0 }
    }

    pub fn next(&mut self) -> HintReply {
        match self.hints.get(self.revealed) {
            Some(text) => {
                self.revealed += 1;
                HintReply::Hint {
                    text: text.clone(),
                    number: self.revealed,
                    remaining: self.hints.len() - self.revealed,
                }
            }
            None => HintReply::NoMoreHints,
        }
    }

    /// Re-arm with a new puzzle's hints.
    pub fn reset(&mut self, hints: Vec<String>) {
        self.hints = hints;
        self.revealed = 0;
    }

    pub fn revealed(&self) -> &[String] {
        &self.hints[..self.revealed]
    }

    pub fn total(&self) -> usize {
        self.hints.len()
    }
}
