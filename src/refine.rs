use crate::patterns::{compile, compile_table, replace_all};
use anyhow::{Result, anyhow};
use rand::Rng;
use rand::seq::SliceRandom;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Poetic,
    Mystic,
    Calm,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Poetic => "poetic",
            Tone::Mystic => "mystic",
            Tone::Calm => "calm",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "poetic" => Ok(Tone::Poetic),
            "mystic" => Ok(Tone::Mystic),
            "calm" => Ok(Tone::Calm),
            _ => Err(anyhow!("Unknown tone: {raw}. Expected poetic|mystic|calm")),
        }
    }
}

const SYNONYMS: &[(&str, &[&str])] = &[
    ("i saw", &["I witnessed", "I beheld", "I glimpsed"]),
    ("i walked", &["I wandered", "I drifted", "I journeyed"]),
    ("i felt", &["I sensed", "I experienced", "I perceived"]),
    ("there was", &["there existed", "there appeared", "there stood"]),
    ("very", &["profoundly", "immensely", "deeply"]),
    ("really", &["truly", "genuinely", "utterly"]),
    ("nice", &["wondrous", "graceful", "serene"]),
    ("scary", &["haunting", "unsettling", "shadowed"]),
    ("weird", &["ethereal", "otherworldly", "surreal"]),
    ("great", &["majestic", "awe-striking", "resplendent"]),
    ("small", &["delicate", "minute", "subtle"]),
];

const MYSTIC_WORDS: &[(&str, &[&str])] = &[
    ("dream", &["vision", "reverie", "phantasm"]),
    ("sky", &["celestial veil", "astral expanse", "heavens"]),
    ("light", &["radiance", "aura", "glow"]),
];

const CALM_WORDS: &[(&str, &[&str])] = &[
    ("haunting", &["softly distant"]),
    ("shadowed", &["hushed"]),
    ("profoundly", &["gently"]),
];

const THEMED_QUOTES: &[(&[&str], &str)] = &[
    (
        &["fly", "float", "soar"],
        "In dreams, gravity is but a suggestion, and the sky embraces all who dare to rise.",
    ),
    (
        &["water", "ocean", "sea"],
        "The depths of dreams mirror the ocean: vast, mysterious, and teeming with unseen life.",
    ),
    (
        &["dark", "shadow", "night"],
        "Even in the darkest dreams, the soul searches for its light.",
    ),
    (
        &["fear", "chased", "escape"],
        "Even nightmares are teachers wearing darker robes.",
    ),
    (
        &["love", "heart"],
        "Dreams weave tenderness from memory and longing alike.",
    ),
    (
        &["friend", "family"],
        "Dreams reunite us with those the waking world has taken away.",
    ),
];

const GENERAL_QUOTES: &[&str] = &[
    "The mind wanders where reality dares not.",
    "In dreams, we touch the infinite.",
    "Every dream is a door to another world.",
    "Sleep whispers what the heart cannot say.",
    "Dreams are the soul's poetry.",
    "In the realm of sleep, all things are possible.",
    "The unconscious speaks in symbols and stars.",
    "Each dream is a universe unto itself.",
];

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s+"));
static SENTENCE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[^.!?]+[.!?]+|[^.!?]+$"));
static OPENING: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)^(In|Upon|Within|Through|Amidst)"));
static SPACE_BEFORE_PUNCT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s([,;:.!?])"));
static REPEATED_SPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s{2,}"));

static SYNONYM_RULES: LazyLock<Vec<(Regex, &'static [&'static str])>> =
    LazyLock::new(|| word_rules(SYNONYMS));
static MYSTIC_RULES: LazyLock<Vec<(Regex, &'static [&'static str])>> =
    LazyLock::new(|| word_rules(MYSTIC_WORDS));
static CALM_RULES: LazyLock<Vec<(Regex, &'static [&'static str])>> =
    LazyLock::new(|| word_rules(CALM_WORDS));

/// Rewrites raw dream notes into more evocative prose.
///
/// Each phrase gets one randomly chosen synonym per sentence. The result
/// always ends in terminal punctuation; blank input yields an empty string.
pub fn improve_dream_text<R: Rng>(text: &str, tone: Tone, rng: &mut R) -> String {
    let cleaned = replace_all(&WHITESPACE, text.trim(), " ");
    if cleaned.is_empty() {
        return String::new();
    }

    let mut sentences = SENTENCE
        .iter()
        .flat_map(|regex| regex.find_iter(&cleaned))
        .map(|found| found.as_str())
        .collect::<Vec<_>>();
    if sentences.is_empty() {
        sentences.push(&cleaned);
    }

    let joined = sentences
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| {
            let mut sentence = sentence.trim().to_string();
            let opened = OPENING.iter().any(|regex| regex.is_match(&sentence));
            if index == 0 && !opened {
                sentence = format!("In this dream, {}", lowercase_first(&sentence));
            }

            sentence = apply_rules(&sentence, &SYNONYM_RULES, rng);
            match tone {
                Tone::Mystic => apply_rules(&sentence, &MYSTIC_RULES, rng),
                Tone::Calm => apply_rules(&sentence, &CALM_RULES, rng),
                Tone::Poetic => sentence,
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let tightened = replace_all(&SPACE_BEFORE_PUNCT, &joined, "$1");
    let improved = replace_all(&REPEATED_SPACE, &tightened, " ");

    if improved.ends_with(['.', '!', '?']) {
        improved
    } else {
        format!("{improved}.")
    }
}

/// A theme-specific quote when the content mentions one, otherwise a random general one.
pub fn generate_quote<R: Rng>(content: &str, rng: &mut R) -> String {
    let normalized = content.to_lowercase();

    THEMED_QUOTES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| normalized.contains(needle)))
        .map(|(_, quote)| *quote)
        .or_else(|| GENERAL_QUOTES.choose(rng).copied())
        .unwrap_or(GENERAL_QUOTES[0])
        .to_string()
}

fn apply_rules<R: Rng>(
    sentence: &str,
    rules: &[(Regex, &'static [&'static str])],
    rng: &mut R,
) -> String {
    rules
        .iter()
        .fold(sentence.to_string(), |current, (regex, choices)| {
            match choices.choose(rng) {
                Some(choice) => regex.replace_all(&current, NoExpand(*choice)).into_owned(),
                None => current,
            }
        })
}

fn lowercase_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    chars
        .next()
        .map(|first| first.to_lowercase().chain(chars).collect())
        .unwrap_or_default()
}

fn word_rules(
    table: &'static [(&'static str, &'static [&'static str])],
) -> Vec<(Regex, &'static [&'static str])> {
    compile_table(
        table
            .iter()
            .map(|(phrase, choices)| (*choices, format!(r"(?i)\b{phrase}\b"))),
    )
    .into_iter()
    .map(|(choices, regex)| (regex, choices))
    .collect()
}
