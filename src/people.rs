//! People tracked by foodbot.
//!
//! Table keys are person identifiers. Turning a key back into a [`Person`]
//! is the job of a [`PersonResolver`]; where people come from (chat
//! platforms, rosters) is outside the record store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A tracked person, identified by their table key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Table key.
    pub id: String,
    /// Display name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Person {
    /// A person known only by id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// A person with a display name.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Resolves table keys to people.
pub trait PersonResolver {
    fn resolve(&self, key: &str) -> Person;
}

impl<F> PersonResolver for F
where
    F: Fn(&str) -> Person,
{
    fn resolve(&self, key: &str) -> Person {
        self(key)
    }
}

/// Resolver backed by an id to display name map.
///
/// Unknown ids resolve to a bare [`Person::new`].
#[derive(Debug, Clone, Default)]
pub struct PersonDirectory {
    names: BTreeMap<String, String>,
}

impl PersonDirectory {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    /// Look up a person by id or by display name.
    pub fn find(&self, query: &str) -> Person {
        if self.names.contains_key(query) {
            return self.resolve(query);
        }
        self.names
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(query))
            .map(|(id, name)| Person::named(id.clone(), name.clone()))
            .unwrap_or_else(|| Person::new(query))
    }
}

impl PersonResolver for PersonDirectory {
    fn resolve(&self, key: &str) -> Person {
        match self.names.get(key) {
            Some(name) => Person::named(key, name.clone()),
            None => Person::new(key),
        }
    }
}
