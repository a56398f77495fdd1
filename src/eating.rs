//! Eating preferences on top of a storage engine.
//!
//! Each person's record holds an `eating_default` field plus one field per
//! calendar date, named by the date in [`DATE_FORMAT`]. Values are the
//! literal strings `"True"` and `"False"`; anything else, including a missing
//! field or an empty string, means "unset".

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::Result;
use crate::people::{Person, PersonResolver};
use crate::storage::{table::fields, Fields, StorageEngine};

/// Field holding a person's default preference.
pub const DEFAULT_FIELD: &str = "eating_default";

/// Format used to name date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name for `date`.
pub fn date_field(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date in [`DATE_FORMAT`].
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Stored form of a three-valued flag.
pub fn encode_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "True",
        Some(false) => "False",
        None => "",
    }
}

/// Read a stored flag. Only `"True"` and `"False"` are recognized.
pub fn decode_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("True") => Some(true),
        Some("False") => Some(false),
        _ => None,
    }
}

/// Eating preference book over an explicit engine and resolver.
///
/// All mutations stay in the engine's in-memory table until [`push`] is
/// called.
///
/// [`push`]: EatingBook::push
pub struct EatingBook<E, R> {
    engine: E,
    resolver: R,
}

impl<E: StorageEngine, R: PersonResolver> EatingBook<E, R> {
    pub fn new(engine: E, resolver: R) -> Self {
        Self { engine, resolver }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Reload the table from the backend.
    pub fn pull(&mut self) -> Result<()> {
        self.engine.pull()
    }

    /// Flush the table to the backend.
    pub fn push(&mut self) -> Result<()> {
        self.engine.push()
    }

    /// Set the preference used when nothing is recorded for a date.
    pub fn set_eating_default(&mut self, person: &Person, flag: bool) {
        self.engine
            .update(&person.id, fields([(DEFAULT_FIELD, encode_flag(Some(flag)))]));
    }

    /// The person's default preference, if one was set.
    pub fn eating_default(&self, person: &Person) -> Option<bool> {
        self.field(person, DEFAULT_FIELD)
    }

    /// Record whether `person` eats on `date`. `None` clears the mark.
    pub fn set_eating(&mut self, person: &Person, date: NaiveDate, flag: Option<bool>) {
        self.engine
            .update(&person.id, fields([(date_field(date), encode_flag(flag))]));
    }

    /// Clear the mark for `date`.
    pub fn untag(&mut self, person: &Person, date: NaiveDate) {
        self.set_eating(person, date, None);
    }

    /// Whether `person` eats on `date`, if marked.
    pub fn eating(&self, person: &Person, date: NaiveDate) -> Option<bool> {
        self.field(person, &date_field(date))
    }

    /// Every known person's mark for `date`.
    pub fn get_eatings(&self, date: NaiveDate) -> BTreeMap<Person, Option<bool>> {
        let name = date_field(date);
        self.engine
            .read_all()
            .iter()
            .map(|(key, fields)| {
                let flag = decode_flag(fields.get(&name).map(String::as_str));
                (self.resolver.resolve(key), flag)
            })
            .collect()
    }

    /// Drop everything recorded for `person`.
    pub fn forget(&mut self, person: &Person) -> Result<Fields> {
        self.engine.delete(&person.id)
    }

    fn field(&self, person: &Person, name: &str) -> Option<bool> {
        let record = self.engine.read(&person.id)?;
        decode_flag(record.get(name).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::PersonDirectory;
    use crate::sheet::{MemoryWorksheet, SheetEngine};
    use crate::storage::{MemoryEngine, Records};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_with(records: Records) -> EatingBook<MemoryEngine, PersonDirectory> {
        EatingBook::new(
            MemoryEngine::with_records(records),
            PersonDirectory::default(),
        )
    }

    fn record(key: &str, pairs: &[(&str, &str)]) -> Records {
        let mut records = Records::new();
        records.insert(key.to_string(), fields(pairs.iter().copied()));
        records
    }

    #[test]
    fn test_date_field_format() {
        assert_eq!(date_field(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(parse_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05.01.2024"), None);
    }

    #[test]
    fn test_flag_encoding() {
        assert_eq!(encode_flag(Some(true)), "True");
        assert_eq!(encode_flag(Some(false)), "False");
        assert_eq!(encode_flag(None), "");

        assert_eq!(decode_flag(Some("True")), Some(true));
        assert_eq!(decode_flag(Some("False")), Some(false));
        assert_eq!(decode_flag(Some("")), None);
        assert_eq!(decode_flag(Some("maybe")), None);
        assert_eq!(decode_flag(Some("true")), None);
        assert_eq!(decode_flag(None), None);
    }

    #[test]
    fn test_get_eatings_scenario() {
        let book = book_with(record("7", &[("2024-01-05", "True")]));

        let first = book.get_eatings(date(2024, 1, 5));
        assert_eq!(first.len(), 1);
        assert_eq!(first[&Person::new("7")], Some(true));

        let second = book.get_eatings(date(2024, 1, 6));
        assert_eq!(second[&Person::new("7")], None);
    }

    #[test]
    fn test_get_eatings_three_valued() {
        let mut records = record("1", &[("2024-01-05", "True")]);
        records.extend(record("2", &[("2024-01-05", "False")]));
        records.extend(record("3", &[("2024-01-05", "maybe")]));
        records.extend(record("4", &[("2024-01-05", "")]));
        records.extend(record("5", &[]));
        let book = book_with(records);

        let eatings = book.get_eatings(date(2024, 1, 5));
        assert_eq!(eatings[&Person::new("1")], Some(true));
        assert_eq!(eatings[&Person::new("2")], Some(false));
        assert_eq!(eatings[&Person::new("3")], None);
        assert_eq!(eatings[&Person::new("4")], None);
        assert_eq!(eatings[&Person::new("5")], None);
    }

    #[test]
    fn test_get_eatings_uses_resolver() {
        let mut names = BTreeMap::new();
        names.insert("7".to_string(), "Ivan".to_string());
        let book = EatingBook::new(
            MemoryEngine::with_records(record("7", &[("2024-01-05", "False")])),
            PersonDirectory::new(names),
        );

        let eatings = book.get_eatings(date(2024, 1, 5));
        assert_eq!(eatings[&Person::named("7", "Ivan")], Some(false));
    }

    #[test]
    fn test_set_eating_writes_field() {
        let mut book = book_with(Records::new());
        let person = Person::new("7");

        book.set_eating(&person, date(2024, 1, 5), Some(true));
        book.set_eating(&person, date(2024, 1, 6), Some(false));

        assert_eq!(
            book.engine().read("7"),
            Some(fields([("2024-01-05", "True"), ("2024-01-06", "False")]))
        );
        assert_eq!(book.eating(&person, date(2024, 1, 5)), Some(true));
        assert_eq!(book.eating(&person, date(2024, 1, 6)), Some(false));
        assert_eq!(book.eating(&person, date(2024, 1, 7)), None);
    }

    #[test]
    fn test_untag_stores_empty_string() {
        let mut book = book_with(record("7", &[("2024-01-05", "True")]));
        let person = Person::new("7");

        book.untag(&person, date(2024, 1, 5));

        assert_eq!(book.engine().read("7"), Some(fields([("2024-01-05", "")])));
        assert_eq!(book.eating(&person, date(2024, 1, 5)), None);
    }

    #[test]
    fn test_default_survives_date_updates() {
        let mut book = book_with(Records::new());
        let person = Person::new("7");

        book.set_eating_default(&person, false);
        book.set_eating(&person, date(2024, 1, 5), Some(true));

        assert_eq!(book.eating_default(&person), Some(false));
        assert_eq!(
            book.engine().read("7"),
            Some(fields([("2024-01-05", "True"), ("eating_default", "False")]))
        );
    }

    #[test]
    fn test_new_person_does_not_touch_others() {
        let mut book = book_with(record("1", &[("eating_default", "True")]));

        book.set_eating(&Person::new("2"), date(2024, 1, 5), Some(true));

        assert_eq!(book.engine().read_all().len(), 2);
        assert_eq!(book.eating_default(&Person::new("1")), Some(true));
    }

    #[test]
    fn test_forget() {
        let mut book = book_with(record("7", &[("eating_default", "True")]));

        book.forget(&Person::new("7")).unwrap();
        assert!(book.get_eatings(date(2024, 1, 5)).is_empty());
        assert!(book.forget(&Person::new("7")).is_err());
    }

    #[test]
    fn test_push_pull_through_sheet() {
        let engine = SheetEngine::open(MemoryWorksheet::new()).unwrap();
        let mut book = EatingBook::new(engine, PersonDirectory::default());
        let person = Person::new("7");

        book.set_eating(&person, date(2024, 1, 5), Some(true));
        book.set_eating(&person, date(2024, 1, 6), None);
        book.push().unwrap();
        book.pull().unwrap();

        // The cleared date does not survive the grid
        assert_eq!(book.engine().read("7"), Some(fields([("2024-01-05", "True")])));
        assert_eq!(book.eating(&person, date(2024, 1, 6)), None);
    }
}
