//! Eatings command for foodbot.
//!
//! Lists every known person's eating mark for one date.

use chrono::NaiveDate;
use serde::Serialize;

use crate::eating::{date_field, EatingBook};
use crate::people::PersonResolver;
use crate::storage::StorageEngine;

/// One person's mark in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct EatingEntry {
    /// Person id (table key).
    pub id: String,
    /// Display name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `true`, `false` or `null` when unset.
    pub eating: Option<bool>,
}

/// Output format for the eatings command.
#[derive(Debug, Clone, Serialize)]
pub struct EatingsOutput {
    /// Date in field format.
    pub date: String,
    /// Number of people marked as eating.
    pub eating: usize,
    /// Number of people marked as not eating.
    pub not_eating: usize,
    /// Number of people without a mark.
    pub unset: usize,
    /// Per-person marks, ordered by id.
    pub entries: Vec<EatingEntry>,
}

impl EatingsOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if self.entries.is_empty() {
            return format!("No people recorded ({}).", self.date);
        }

        let mut lines = vec![format!(
            "{}: {} eating, {} not eating, {} unset",
            self.date, self.eating, self.not_eating, self.unset
        )];
        lines.push(String::new());

        for entry in &self.entries {
            let who = match &entry.name {
                Some(name) => format!("{} ({})", name, entry.id),
                None => entry.id.clone(),
            };
            let mark = match entry.eating {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            };
            lines.push(format!("{:<30}  {}", who, mark));
        }

        lines.join("\n")
    }
}

/// The eatings command implementation.
pub struct EatingsCommand<'a, E, R> {
    book: &'a EatingBook<E, R>,
}

impl<'a, E: StorageEngine, R: PersonResolver> EatingsCommand<'a, E, R> {
    /// Create a new eatings command.
    pub fn new(book: &'a EatingBook<E, R>) -> Self {
        Self { book }
    }

    /// Run the eatings command for `date`.
    pub fn run(&self, date: NaiveDate) -> EatingsOutput {
        let entries: Vec<EatingEntry> = self
            .book
            .get_eatings(date)
            .into_iter()
            .map(|(person, eating)| EatingEntry {
                id: person.id,
                name: person.name,
                eating,
            })
            .collect();

        let count = |want: Option<bool>| entries.iter().filter(|e| e.eating == want).count();

        EatingsOutput {
            date: date_field(date),
            eating: count(Some(true)),
            not_eating: count(Some(false)),
            unset: count(None),
            entries,
        }
    }
}
