pub const CREATE_SLOTS: &str = r#"
CREATE TABLE IF NOT EXISTS slots (
  name        TEXT PRIMARY KEY,
  value       TEXT NOT NULL,
  updated_at  INTEGER NOT NULL
);
"#;

pub const SELECT_SLOT: &str = "SELECT value FROM slots WHERE name = ?1";

pub const SELECT_SLOT_UPDATED_AT: &str = "SELECT updated_at FROM slots WHERE name = ?1";

pub const UPSERT_SLOT: &str = "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)
 ON CONFLICT(name)
 DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at";

pub const DELETE_SLOT: &str = "DELETE FROM slots WHERE name = ?1";

pub fn schema_statements() -> Vec<&'static str> {
    vec![CREATE_SLOTS]
}
