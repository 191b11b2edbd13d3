use crate::analyzer::streak::{StreakStats, compute_streaks};
use crate::journal::model::{Category, Entry, Tag};
use crate::refine::generate_quote;
use anyhow::{Context, Result};
use chrono::{NaiveDate, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub date: String,
    pub generated_at: String,
    pub total_entries: usize,
    pub synthetic_entries: usize,
    pub categories: BTreeMap<Category, usize>,
    pub tags: BTreeMap<Tag, usize>,
    pub streaks: StreakStats,
    pub last_entry: Option<String>,
    pub quote: Option<String>,
}

#[derive(Debug)]
pub struct SavedSummary {
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
}

pub fn build_summary<R: Rng>(
    entries: &[Entry],
    day_keys: &[String],
    today: NaiveDate,
    rng: &mut R,
) -> JournalSummary {
    let mut categories = Category::ALL
        .into_iter()
        .map(|category| (category, 0_usize))
        .collect::<BTreeMap<_, _>>();
    entries
        .iter()
        .for_each(|entry| *categories.entry(entry.category).or_default() += 1);

    let tags = entries
        .iter()
        .flat_map(|entry| entry.tag_list().iter().copied())
        .fold(BTreeMap::new(), |mut acc, tag| {
            *acc.entry(tag).or_insert(0_usize) += 1;
            acc
        });

    let last = entries.last();

    JournalSummary {
        date: today.format("%Y-%m-%d").to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        total_entries: entries.len(),
        synthetic_entries: entries.iter().filter(|entry| entry.synthetic()).count(),
        categories,
        tags,
        streaks: compute_streaks(day_keys, today),
        last_entry: last.map(|entry| entry.title.clone()),
        quote: last.map(|entry| generate_quote(&entry.content, rng)),
    }
}

pub fn render_markdown(summary: &JournalSummary) -> String {
    let category_rows = summary
        .categories
        .iter()
        .map(|(category, count)| {
            format!(
                "| {} | {} | {:.0}% |",
                category,
                count,
                ratio(*count, summary.total_entries)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let tag_rows = if summary.tags.is_empty() {
        "- No tags yet".to_string()
    } else {
        summary
            .tags
            .iter()
            .map(|(tag, count)| format!("- {tag}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let quote = summary
        .quote
        .as_deref()
        .map(|quote| format!("> {quote}"))
        .unwrap_or_else(|| "> Your tome awaits its first dream.".to_string());

    format!(
        "# Dream Reflections - {}\n\n## Summary\n- Dreams recorded: {}\n- Demo dreams: {}\n- Most recent: {}\n\n## Streaks\n- Current streak: {}\n- Longest streak: {}\n- Days with dreams: {}\n\n## Dreams by Category\n| Category | Dreams | Ratio |\n|----------|--------|-------|\n{}\n\n## Tags\n{}\n\n## Reflection\n{}\n",
        summary.date,
        summary.total_entries,
        summary.synthetic_entries,
        summary.last_entry.as_deref().unwrap_or("None"),
        format_days(summary.streaks.current),
        format_days(summary.streaks.longest),
        summary.streaks.total,
        category_rows,
        tag_rows,
        quote
    )
}

pub fn save_summary_files(summary: &JournalSummary, dir: &Path) -> Result<SavedSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let stem = format!("reflections-{}", summary.date);
    let markdown_path = dir.join(format!("{stem}.md"));
    let json_path = dir.join(format!("{stem}.json"));

    fs::write(&markdown_path, render_markdown(summary)).with_context(|| {
        format!(
            "Failed to write Markdown summary: {}",
            markdown_path.display()
        )
    })?;

    let json_content =
        serde_json::to_string_pretty(summary).context("Failed to serialize summary JSON")?;
    fs::write(&json_path, json_content)
        .with_context(|| format!("Failed to write JSON summary: {}", json_path.display()))?;

    Ok(SavedSummary {
        markdown_path,
        json_path,
    })
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

fn format_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

#[cfg(test)]
mod tests {
    use super::{build_summary, render_markdown, save_summary_files};
    use crate::journal::model::{Category, Entry, Tag};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(id: &str, category: Category, tags: Option<Vec<Tag>>, synthetic: bool) -> Entry {
        Entry {
            id: id.to_string(),
            title: format!("Dream {id}"),
            content: "I could fly over the sea".to_string(),
            original_content: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 3, 6, 0, 0).unwrap(),
            category,
            tags,
            is_synthetic: synthetic.then_some(true),
        }
    }

    #[test]
    fn summary_counts_categories_tags_and_streaks() {
        let entries = vec![
            entry("1", Category::Epic, Some(vec![Tag::Lucid, Tag::Recurring]), false),
            entry("2", Category::Epic, Some(vec![Tag::Lucid]), false),
            entry("3", Category::Nightmare, None, true),
        ];
        let day_keys = vec!["2024-01-02".to_string(), "2024-01-03".to_string()];
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        let summary = build_summary(&entries, &day_keys, today, &mut StdRng::seed_from_u64(1));

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.synthetic_entries, 1);
        assert_eq!(summary.categories.len(), 4);
        assert_eq!(summary.categories[&Category::Epic], 2);
        assert_eq!(summary.categories[&Category::Serene], 0);
        assert_eq!(summary.tags[&Tag::Lucid], 2);
        assert!(!summary.tags.contains_key(&Tag::Prophetic));
        assert_eq!(summary.streaks.current, 2);
        assert_eq!(summary.last_entry.as_deref(), Some("Dream 3"));
        assert!(summary.quote.as_deref().is_some_and(|quote| quote.starts_with("In dreams, gravity")));
    }

    #[test]
    fn empty_journal_renders_placeholders() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let summary = build_summary(&[], &[], today, &mut StdRng::seed_from_u64(1));
        let markdown = render_markdown(&summary);

        assert!(markdown.starts_with("# Dream Reflections - 2024-01-03"));
        assert!(markdown.contains("- Current streak: 0 days"));
        assert!(markdown.contains("| Strange | 0 | 0% |"));
        assert!(markdown.contains("- No tags yet"));
        assert!(markdown.contains("> Your tome awaits its first dream."));
    }

    #[test]
    fn summary_serializes_category_keys_as_names() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let entries = vec![entry("1", Category::Serene, None, false)];
        let summary = build_summary(&entries, &[], today, &mut StdRng::seed_from_u64(1));

        let json = serde_json::to_value(&summary).expect("summary json");
        assert_eq!(json["categories"]["Serene"], 1);
        assert_eq!(json["streaks"]["longest"], 0);
    }

    #[test]
    fn saved_summary_files_are_named_by_date() {
        let dir = tempfile::tempdir().expect("temp dir");
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let summary = build_summary(&[], &[], today, &mut StdRng::seed_from_u64(1));

        let saved = save_summary_files(&summary, dir.path()).expect("save summary");

        assert!(saved.markdown_path.ends_with("reflections-2024-01-03.md"));
        let json = std::fs::read_to_string(&saved.json_path).expect("read json");
        assert!(json.contains("\"total_entries\": 0"));
    }
}
