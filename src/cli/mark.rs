//! Mark commands for foodbot.
//!
//! Change a person's eating mark for a date, their default, or drop them
//! entirely, then push the table so the change is durable.

use chrono::NaiveDate;
use serde::Serialize;

use crate::eating::{date_field, EatingBook};
use crate::error::Result;
use crate::people::{Person, PersonResolver};
use crate::storage::StorageEngine;

/// A change to apply to one person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Set (or clear, with `None`) the mark for a date.
    Date(NaiveDate, Option<bool>),
    /// Set the default preference.
    Default(bool),
    /// Remove the person's record.
    Forget,
}

impl Mark {
    fn describe(&self) -> String {
        let word = |flag: Option<bool>| match flag {
            Some(true) => "eating",
            Some(false) => "not eating",
            None => "unset",
        };
        match self {
            Mark::Date(date, flag) => format!("{} on {}", word(*flag), date_field(*date)),
            Mark::Default(flag) => format!("{} by default", word(Some(*flag))),
            Mark::Forget => "forgotten".to_string(),
        }
    }
}

/// Parse a yes/no/unset answer.
pub fn parse_flag(value: &str) -> Option<Option<bool>> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "+" => Some(Some(true)),
        "no" | "n" | "false" | "-" => Some(Some(false)),
        "unset" | "clear" | "?" => Some(None),
        _ => None,
    }
}

/// Output format for the mark command.
#[derive(Debug, Clone, Serialize)]
pub struct MarkOutput {
    /// Whether the change was applied and pushed.
    pub success: bool,
    /// Person the change applied to.
    pub person: Person,
    /// What changed.
    pub change: String,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarkOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            None => format!("{}: {}", self.person, self.change),
            Some(error) => format!("Could not update {}: {}", self.person, error),
        }
    }
}

/// The mark command implementation.
pub struct MarkCommand<'a, E, R> {
    book: &'a mut EatingBook<E, R>,
}

impl<'a, E: StorageEngine, R: PersonResolver> MarkCommand<'a, E, R> {
    /// Create a new mark command.
    pub fn new(book: &'a mut EatingBook<E, R>) -> Self {
        Self { book }
    }

    /// Apply `mark` to `person` and push.
    pub fn run(&mut self, person: &Person, mark: Mark) -> MarkOutput {
        let change = mark.describe();
        match self.apply(person, mark) {
            Ok(()) => MarkOutput {
                success: true,
                person: person.clone(),
                change,
                error: None,
            },
            Err(e) => MarkOutput {
                success: false,
                person: person.clone(),
                change,
                error: Some(e.to_string()),
            },
        }
    }

    fn apply(&mut self, person: &Person, mark: Mark) -> Result<()> {
        match mark {
            Mark::Date(date, flag) => self.book.set_eating(person, date, flag),
            Mark::Default(flag) => self.book.set_eating_default(person, flag),
            Mark::Forget => {
                self.book.forget(person)?;
            }
        }
        self.book.push()
    }
}
