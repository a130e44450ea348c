//! Confirmation prompts as a service.
//!
//! Destructive actions ask a [`ConfirmDialog`] and act on the returned
//! [`Confirmation`], so flows can be exercised without a terminal.

use std::sync::Mutex;

use crate::error::AgendaResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes {
            Confirmation::Confirmed
        } else {
            Confirmation::Cancelled
        }
    }
}

pub trait ConfirmDialog {
    fn confirm(&self, prompt: &str) -> AgendaResult<Confirmation>;
}

/// Answers every prompt the same way and remembers what was asked.
pub struct AutoConfirm {
    answer: Confirmation,
    asked: Mutex<Vec<String>>,
}

impl AutoConfirm {
    pub fn new(answer: Confirmation) -> Self {
        AutoConfirm {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn yes() -> Self {
        Self::new(Confirmation::Confirmed)
    }

    pub fn no() -> Self {
        Self::new(Confirmation::Cancelled)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl ConfirmDialog for AutoConfirm {
    fn confirm(&self, prompt: &str) -> AgendaResult<Confirmation> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        Ok(self.answer)
    }
}

/// Prompt shown before deleting an item.
pub fn delete_prompt(title: &str) -> String {
    format!("Delete \"{}\"?", title)
}
