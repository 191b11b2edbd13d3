pub mod queries;

use crate::journal::storage::SlotStorage;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

/// SQLite file holding the journal's named slots.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    pub fn slot_updated_at(&self, slot: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(queries::SELECT_SLOT_UPDATED_AT, params![slot], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read slot metadata: {slot}"))
    }
}

impl SlotStorage for Database {
    fn read_slot(&self, slot: &str) -> Result<Option<String>> {
        self.conn
            .query_row(queries::SELECT_SLOT, params![slot], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read slot: {slot}"))
    }

    fn write_slot(&mut self, slot: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                queries::UPSERT_SLOT,
                params![slot, value, Utc::now().timestamp()],
            )
            .with_context(|| format!("Failed to write slot: {slot}"))?;

        Ok(())
    }

    fn remove_slot(&mut self, slot: &str) -> Result<()> {
        self.conn
            .execute(queries::DELETE_SLOT, params![slot])
            .with_context(|| format!("Failed to remove slot: {slot}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::journal::model::EntryInput;
    use crate::journal::storage::SlotStorage;
    use crate::journal::{ENTRIES_SLOT, Journal};

    #[test]
    fn slots_round_trip_through_sqlite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("journal.db");

        let mut database = Database::open(&path).expect("open db");
        assert_eq!(database.read_slot("missing").expect("read"), None);

        database.write_slot("a", "[1]").expect("write");
        database.write_slot("a", "[2]").expect("overwrite");
        assert_eq!(database.read_slot("a").expect("read").as_deref(), Some("[2]"));
        assert!(database.slot_updated_at("a").expect("meta").is_some());

        database.remove_slot("a").expect("remove");
        assert_eq!(database.read_slot("a").expect("read"), None);
    }

    #[test]
    fn journal_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("journal.db");

        {
            let mut journal = Journal::load(Database::open(&path).expect("open db"));
            journal
                .create(EntryInput {
                    title: "Moonlit stairs".to_string(),
                    content: "A calm climb under the moon".to_string(),
                    ..EntryInput::default()
                })
                .expect("create");
        }

        let journal = Journal::load(Database::open(&path).expect("reopen db"));
        assert_eq!(journal.entries().len(), 1);
        assert_eq!(journal.entries()[0].title, "Moonlit stairs");
        assert_eq!(journal.day_keys().len(), 1);
    }

    #[test]
    fn corrupted_sqlite_slot_is_erased_on_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("journal.db");

        let mut database = Database::open(&path).expect("open db");
        database
            .write_slot(ENTRIES_SLOT, "definitely not json")
            .expect("seed garbage");

        let journal = Journal::load(database);
        assert!(journal.entries().is_empty());

        let database = Database::open(&path).expect("reopen db");
        assert_eq!(database.read_slot(ENTRIES_SLOT).expect("read"), None);
    }
}
