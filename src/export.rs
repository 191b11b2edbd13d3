use crate::journal::model::Entry;
use crate::patterns::{compile, replace_all};
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const MAX_SLUG_CHARS: usize = 50;
const FILE_PREFIX: &str = "dreamtome";

static NON_SLUG_CHARS: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[^\w\s-]"));
static SLUG_SEPARATORS: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[\s_-]+"));

/// The fields an export card shows.
#[derive(Debug, Clone, Serialize)]
pub struct ExportCard<'a> {
    pub title: &'a str,
    pub category: String,
    pub tags: Vec<String>,
    pub date: String,
    pub content: &'a str,
}

impl<'a> ExportCard<'a> {
    pub fn from_entry(entry: &'a Entry) -> Self {
        Self {
            title: &entry.title,
            category: entry.category.to_string(),
            tags: entry.tag_list().iter().map(ToString::to_string).collect(),
            date: entry.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            content: &entry.content,
        }
    }

    pub fn render_markdown(&self) -> String {
        let tags = if self.tags.is_empty() {
            String::new()
        } else {
            format!(
                "\n{}",
                self.tags
                    .iter()
                    .map(|tag| format!("`{tag}`"))
                    .collect::<Vec<_>>()
                    .join(" ")
            )
        };

        format!(
            "# {}\n\n*{} dream, {}*{}\n\n{}\n\n---\nInscribed in DreamTome\n",
            self.title, self.category, self.date, tags, self.content
        )
    }
}

#[derive(Debug)]
pub struct ExportedCard {
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
}

/// Lowercased, hyphen-separated file name fragment, at most 50 characters.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = replace_all(&NON_SLUG_CHARS, &lowered, "");
    let hyphenated = replace_all(&SLUG_SEPARATORS, &stripped, "-");

    hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect()
}

pub fn export_entry(entry: &Entry, dir: &Path) -> Result<ExportedCard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let slug = match slugify(&entry.title) {
        slug if slug.is_empty() => "dream".to_string(),
        slug => slug,
    };
    let markdown_path = dir.join(format!("{FILE_PREFIX}-{slug}.md"));
    let json_path = dir.join(format!("{FILE_PREFIX}-{slug}.json"));

    let card = ExportCard::from_entry(entry);

    fs::write(&markdown_path, card.render_markdown()).with_context(|| {
        format!(
            "Failed to write dream card: {}",
            markdown_path.display()
        )
    })?;

    let json_content =
        serde_json::to_string_pretty(&card).context("Failed to serialize dream card")?;
    fs::write(&json_path, json_content)
        .with_context(|| format!("Failed to write dream card JSON: {}", json_path.display()))?;

    Ok(ExportedCard {
        markdown_path,
        json_path,
    })
}

#[cfg(test)]
mod tests {
    use super::{NON_SLUG_CHARS, SLUG_SEPARATORS, export_entry, slugify};
    use crate::journal::model::{Category, Entry, Tag};
    use chrono::{TimeZone, Utc};

    #[test]
    fn every_pattern_compiles() {
        assert!(NON_SLUG_CHARS.is_some());
        assert!(SLUG_SEPARATORS.is_some());
    }

    #[test]
    fn slugify_collapses_separators_and_strips_symbols() {
        assert_eq!(slugify("  The Staircase -- That Never_Ended!  "), "the-staircase-that-never-ended");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify(&"long ".repeat(30)).chars().count(), 50);
    }

    #[test]
    fn export_writes_markdown_and_json_cards() {
        let dir = tempfile::tempdir().expect("temp dir");
        let entry = Entry {
            id: "1".to_string(),
            title: "Lanterns?".to_string(),
            content: "Paper lanterns over the harbor.".to_string(),
            original_content: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 3, 6, 0, 0).unwrap(),
            category: Category::Serene,
            tags: Some(vec![Tag::Lucid]),
            is_synthetic: None,
        };

        let exported = export_entry(&entry, dir.path()).expect("export");

        assert!(exported.markdown_path.ends_with("dreamtome-lanterns.md"));
        let markdown = std::fs::read_to_string(&exported.markdown_path).expect("markdown");
        assert!(markdown.starts_with("# Lanterns?\n\n*Serene dream, 2024-01-03T06:00:00Z*\n`Lucid`"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&exported.json_path).expect("json"))
                .expect("valid json");
        assert_eq!(json["category"], "Serene");
        assert_eq!(json["tags"][0], "Lucid");
    }

    #[test]
    fn untitled_symbols_fall_back_to_dream() {
        let dir = tempfile::tempdir().expect("temp dir");
        let entry = Entry {
            id: "2".to_string(),
            title: "!!!".to_string(),
            content: "...".to_string(),
            original_content: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 3, 6, 0, 0).unwrap(),
            category: Category::Strange,
            tags: None,
            is_synthetic: None,
        };

        let exported = export_entry(&entry, dir.path()).expect("export");
        assert!(exported.json_path.ends_with("dreamtome-dream.json"));
    }
}
