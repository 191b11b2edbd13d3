pub mod categorizer;
pub mod insight;
pub mod report;
pub mod streak;

use crate::analyzer::report::{JournalSummary, SavedSummary};
use crate::config::Config;
use crate::journal::Journal;
use crate::journal::storage::SlotStorage;
use anyhow::Result;
use chrono::NaiveDate;
use rand::Rng;

pub fn summarize<S: SlotStorage, R: Rng>(
    journal: &Journal<S>,
    today: NaiveDate,
    rng: &mut R,
) -> JournalSummary {
    report::build_summary(journal.entries(), journal.day_keys(), today, rng)
}

pub fn generate_and_store_summary<S: SlotStorage, R: Rng>(
    config: &Config,
    journal: &Journal<S>,
    today: NaiveDate,
    rng: &mut R,
) -> Result<(JournalSummary, SavedSummary)> {
    let summary = summarize(journal, today, rng);
    let saved = report::save_summary_files(&summary, &config.export_dir)?;

    Ok((summary, saved))
}
