use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Serene,
    Strange,
    Nightmare,
    Epic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Serene,
        Category::Strange,
        Category::Nightmare,
        Category::Epic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Serene => "Serene",
            Category::Strange => "Strange",
            Category::Nightmare => "Nightmare",
            Category::Epic => "Epic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| anyhow!("Unknown category: {raw}. Expected Serene|Strange|Nightmare|Epic"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Serene,
    Strange,
    Nightmare,
    Epic,
    Lucid,
    Recurring,
    Prophetic,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Serene,
        Tag::Strange,
        Tag::Nightmare,
        Tag::Epic,
        Tag::Lucid,
        Tag::Recurring,
        Tag::Prophetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Serene => "Serene",
            Tag::Strange => "Strange",
            Tag::Nightmare => "Nightmare",
            Tag::Epic => "Epic",
            Tag::Lucid => "Lucid",
            Tag::Recurring => "Recurring",
            Tag::Prophetic => "Prophetic",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "Unknown tag: {raw}. Expected Serene|Strange|Nightmare|Epic|Lucid|Recurring|Prophetic"
                )
            })
    }
}

/// One journaled dream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(alias = "date", with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, alias = "isTest", skip_serializing_if = "Option::is_none")]
    pub is_synthetic: Option<bool>,
}

impl Entry {
    pub fn synthetic(&self) -> bool {
        self.is_synthetic.unwrap_or(false)
    }

    pub fn tag_list(&self) -> &[Tag] {
        self.tags.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntryInput {
    pub title: String,
    pub content: String,
    pub original_content: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_title_chars: usize,
    pub max_content_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_title_chars: 100,
            max_content_chars: 5000,
        }
    }
}

impl EntryInput {
    pub fn validate(&self, limits: InputLimits) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            bail!("Dream title must not be empty");
        }
        if title.chars().count() > limits.max_title_chars {
            bail!(
                "Dream title is too long: {} characters (max {})",
                title.chars().count(),
                limits.max_title_chars
            );
        }

        if self.content.trim().is_empty() {
            bail!("Dream content must not be empty");
        }
        if self.content.chars().count() > limits.max_content_chars {
            bail!(
                "Dream content is too long: {} characters (max {})",
                self.content.chars().count(),
                limits.max_content_chars
            );
        }

        Ok(())
    }
}

/// Fields that may change after creation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub original_content: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<Tag>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.original_content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    pub(crate) fn apply(self, entry: &mut Entry) {
        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(original) = self.original_content {
            entry.original_content = Some(original);
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(tags) = self.tags {
            entry.tags = Some(dedup_tags(tags));
        }
    }
}

/// Keeps the first occurrence of each tag.
pub fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = Vec::with_capacity(tags.len());
    tags.into_iter()
        .filter(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(*tag);
                true
            }
        })
        .collect()
}

mod iso_millis {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).ok_or_else(|| D::Error::custom(format!("invalid createdAt: {raw}")))
    }

    /// RFC 3339 first; ISO-8601 values without an offset are read as UTC.
    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
                    .ok()
                    .map(|naive| naive.and_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Entry, EntryInput, EntryPatch, InputLimits, Tag, dedup_tags};

    #[test]
    fn entry_json_uses_camel_case_and_millis() {
        let json = r#"{"id":"1","title":"Sea","content":"waves","createdAt":"2024-01-03T08:15:00Z","category":"Serene"}"#;
        let entry: Entry = serde_json::from_str(json).expect("entry parses");

        let written = serde_json::to_string(&entry).expect("entry serializes");
        assert_eq!(
            written,
            r#"{"id":"1","title":"Sea","content":"waves","createdAt":"2024-01-03T08:15:00.000Z","category":"Serene"}"#
        );
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let json = r#"{"id":"7","title":"t","content":"c","date":"2024-01-03T08:15:00.000Z","category":"Epic","tags":["Lucid"],"isTest":true}"#;
        let entry: Entry = serde_json::from_str(json).expect("legacy entry parses");

        assert!(entry.synthetic());
        assert_eq!(entry.tag_list(), &[Tag::Lucid]);
    }

    #[test]
    fn created_at_accepts_iso_without_offset() {
        let naive = r#"{"id":"1","title":"t","content":"c","createdAt":"2024-01-03T08:15:00","category":"Serene"}"#;
        let entry: Entry = serde_json::from_str(naive).expect("naive timestamp parses");
        assert_eq!(
            serde_json::to_value(&entry).expect("json")["createdAt"],
            "2024-01-03T08:15:00.000Z"
        );

        let date_only = r#"{"id":"2","title":"t","content":"c","createdAt":"2024-01-03","category":"Serene"}"#;
        let entry: Entry = serde_json::from_str(date_only).expect("date parses");
        assert_eq!(entry.created_at.to_rfc3339(), "2024-01-03T00:00:00+00:00");

        let garbage = r#"{"id":"3","title":"t","content":"c","createdAt":"last night","category":"Serene"}"#;
        assert!(serde_json::from_str::<Entry>(garbage).is_err());
    }

    #[test]
    fn null_optionals_load_as_absent() {
        let json = r#"{"id":"1","title":"t","content":"c","createdAt":"2024-01-03T08:15:00.000Z","category":"Serene","tags":null,"isSynthetic":null}"#;
        let entry: Entry = serde_json::from_str(json).expect("entry parses");

        assert_eq!(entry.tags, None);
        assert!(!entry.synthetic());
        assert_eq!(
            serde_json::to_string(&entry).expect("entry serializes"),
            r#"{"id":"1","title":"t","content":"c","createdAt":"2024-01-03T08:15:00.000Z","category":"Serene"}"#
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let json = r#"{"id":"1","title":"t","content":"c","createdAt":"2024-01-03T08:15:00.000Z","category":"Happy"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn parse_category_and_tag_case_insensitively() {
        assert_eq!("nightmare".parse::<Category>().expect("category"), Category::Nightmare);
        assert_eq!(" PROPHETIC ".parse::<Tag>().expect("tag"), Tag::Prophetic);
        assert!("happy".parse::<Tag>().is_err());
    }

    #[test]
    fn validate_rejects_blank_and_oversized_input() {
        let limits = InputLimits::default();
        let blank = EntryInput {
            title: "   ".to_string(),
            content: "something".to_string(),
            ..EntryInput::default()
        };
        assert!(blank.validate(limits).is_err());

        let long = EntryInput {
            title: "x".repeat(101),
            content: "something".to_string(),
            ..EntryInput::default()
        };
        assert!(long.validate(limits).is_err());

        let ok = EntryInput {
            title: "A night swim".to_string(),
            content: "I swam in a warm sea".to_string(),
            ..EntryInput::default()
        };
        assert!(ok.validate(limits).is_ok());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let tags = dedup_tags(vec![Tag::Lucid, Tag::Epic, Tag::Lucid, Tag::Serene, Tag::Epic]);
        assert_eq!(tags, vec![Tag::Lucid, Tag::Epic, Tag::Serene]);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(EntryPatch::default().is_empty());
        let patch = EntryPatch {
            category: Some(Category::Epic),
            ..EntryPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
