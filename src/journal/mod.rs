pub mod date_key;
pub mod model;
pub mod storage;
pub mod synthetic;

use crate::analyzer::categorizer::categorize;
use crate::journal::date_key::day_key;
use crate::journal::model::{Category, Entry, EntryInput, EntryPatch, dedup_tags};
use crate::journal::storage::SlotStorage;
use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const ENTRIES_SLOT: &str = "dreamtome_dreams";
pub const DAY_KEYS_SLOT: &str = "dreamtome_dream_days";

/// Owner of the entry collection and the day-key set.
///
/// Both collections are loaded once by [`Journal::load`] and written back to
/// the storage slots synchronously on every mutation.
pub struct Journal<S: SlotStorage> {
    storage: S,
    entries: Vec<Entry>,
    day_keys: Vec<String>,
}

impl<S: SlotStorage> Journal<S> {
    pub fn load(mut storage: S) -> Self {
        let entries = load_slot::<Vec<Entry>, _>(&mut storage, ENTRIES_SLOT).unwrap_or_default();
        let day_keys = load_slot::<Vec<String>, _>(&mut storage, DAY_KEYS_SLOT)
            .map(dedup_day_keys)
            .unwrap_or_default();

        debug!(
            entries = entries.len(),
            day_keys = day_keys.len(),
            "journal loaded"
        );

        Self {
            storage,
            entries,
            day_keys,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn day_keys(&self) -> &[String] {
        &self.day_keys
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Case-insensitive match on title or content. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        let query = query.trim().to_lowercase();

        self.entries
            .iter()
            .filter(|entry| {
                query.is_empty()
                    || entry.title.to_lowercase().contains(&query)
                    || entry.content.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn in_category(&self, category: Category) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    pub fn create(&mut self, input: EntryInput) -> Result<Entry> {
        self.create_at(input, Utc::now())
    }

    pub fn create_at(&mut self, input: EntryInput, now: DateTime<Utc>) -> Result<Entry> {
        let created_at = now.trunc_subsecs(3);
        let entry = Entry {
            id: self.next_id(created_at),
            title: input.title.trim().to_string(),
            category: categorize(&input.content),
            content: input.content,
            original_content: input.original_content,
            created_at,
            tags: Some(dedup_tags(input.tags.unwrap_or_default())),
            is_synthetic: None,
        };

        self.entries.push(entry.clone());
        self.record_day(created_at)?;
        self.persist_entries()?;

        Ok(entry)
    }

    /// Returns `Ok(None)` when no entry has `id`.
    pub fn update(&mut self, id: &str, patch: EntryPatch) -> Result<Option<Entry>> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };

        patch.apply(entry);
        let updated = entry.clone();
        self.persist_entries()?;

        Ok(Some(updated))
    }

    /// Day keys are kept: they record that a dream was logged that day.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);

        if self.entries.len() == before {
            return Ok(false);
        }

        self.persist_entries()?;
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.entries.clear();
        self.day_keys.clear();
        self.persist_entries()?;
        self.storage
            .remove_slot(DAY_KEYS_SLOT)
            .context("Failed to remove dream days")?;

        Ok(())
    }

    /// Appends `count` demo entries dated within the last ten days.
    /// Day keys are not recorded for them.
    pub fn generate_synthetic<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Vec<Entry>> {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let entry = Entry {
                id: self.next_synthetic_id(now),
                ..synthetic::sample_entry(rng, now)
            };
            self.entries.push(entry.clone());
            created.push(entry);
        }

        if !created.is_empty() {
            self.persist_entries()?;
        }

        Ok(created)
    }

    pub fn clear_synthetic(&mut self) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.synthetic());
        let removed = before - self.entries.len();

        if removed > 0 {
            self.persist_entries()?;
        }

        Ok(removed)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn record_day(&mut self, timestamp: DateTime<Utc>) -> Result<()> {
        let key = day_key(timestamp);
        if self.day_keys.contains(&key) {
            return Ok(());
        }

        self.day_keys.push(key);
        let payload =
            serde_json::to_string(&self.day_keys).context("Failed to serialize dream days")?;
        self.storage
            .write_slot(DAY_KEYS_SLOT, &payload)
            .context("Failed to save dream days")
    }

    fn persist_entries(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.entries).context("Failed to serialize dreams")?;
        self.storage
            .write_slot(ENTRIES_SLOT, &payload)
            .context("Failed to save dreams")
    }

    fn next_id(&self, created_at: DateTime<Utc>) -> String {
        let mut candidate = created_at.timestamp_millis();
        while self.contains_id(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn next_synthetic_id(&self, now: DateTime<Utc>) -> String {
        let base = now.timestamp_millis();
        (0..)
            .map(|offset| format!("synthetic-{}", base + offset))
            .find(|candidate| !self.contains_id(candidate))
            .unwrap_or_else(|| format!("synthetic-{base}"))
    }

    fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Reads and parses a slot. Absent, unreadable and corrupt slots all yield
/// `None`; a corrupt slot is also erased.
fn load_slot<T: DeserializeOwned, S: SlotStorage>(storage: &mut S, slot: &str) -> Option<T> {
    let raw = match storage.read_slot(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(slot, error = %error, "failed to read journal slot. starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(slot, error = %error, "discarding corrupted journal slot");
            if let Err(remove_error) = storage.remove_slot(slot) {
                warn!(slot, error = %remove_error, "failed to erase corrupted journal slot");
            }
            None
        }
    }
}

fn dedup_day_keys(keys: Vec<String>) -> Vec<String> {
    let mut unique = Vec::with_capacity(keys.len());
    for key in keys {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    unique
}
