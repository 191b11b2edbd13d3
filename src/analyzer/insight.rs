use crate::patterns::compile_table;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const MAX_KEYWORDS: usize = 6;
pub const DEFAULT_EMOTION: &str = "Mysterious";

const SYMBOL_PATTERNS: &[(&str, &str)] = &[
    ("Water", "ocean|sea|river|lake|rain|flood|wave|swimming|drowning"),
    ("Flying", "fly|flying|float|soar|airborne|wings"),
    ("Falling", "fall|falling|drop|plunge|descend"),
    ("Chase", "chase|chased|running|escape|pursued|hunt"),
    ("Death", "death|dying|dead|grave|funeral|corpse"),
    ("Animals", "dog|cat|bird|snake|spider|wolf|bear|dragon|creature"),
    ("Nature", "tree|forest|mountain|garden|flower|plant|wilderness"),
    ("Light", "light|sun|moon|star|glow|bright|radiance|illuminate"),
    ("Darkness", "dark|shadow|night|black|abyss|void"),
    ("People", "person|people|friend|stranger|family|crowd|face"),
    ("Buildings", "house|building|castle|tower|city|room|door|window"),
    ("Journey", "journey|travel|path|road|adventure|quest|destination"),
    ("Magic", "magic|spell|wizard|witch|enchant|mystical|supernatural"),
    ("Love", "love|heart|romance|kiss|embrace|passion"),
    ("Fear", "fear|scared|terror|anxiety|dread|panic"),
    ("Power", "power|strength|control|force|energy|ability"),
    ("Lost", "lost|confused|searching|missing|nowhere"),
    ("Time", "clock|time|hour|past|future|ancient|modern"),
];

// (emotion, pattern, weight) in tie-break order
const EMOTION_PATTERNS: &[(&str, &str, u32)] = &[
    ("Peaceful", "peace|calm|serene|tranquil|gentle|soft|quiet|relax", 1),
    ("Joyful", "joy|happy|delight|wonderful|beautiful|love|warm|bliss", 1),
    ("Anxious", "anxious|worry|nervous|stress|tense|uneasy|concern", 1),
    ("Fearful", "fear|scared|terror|afraid|dread|panic|frightened", 2),
    ("Melancholic", "sad|lonely|empty|loss|mourn|sorrow|distant", 1),
    ("Curious", "wonder|curious|explore|discover|mystery|unknown|strange", 1),
    ("Powerful", "power|strong|mighty|control|victory|triumph|confident", 1),
    ("Confused", "confus|lost|uncertain|unclear|strange|weird|bizarre", 1),
];

const SYMBOL_READINGS: &[(&str, &[&str])] = &[
    (
        "Water",
        &[
            "Water often symbolizes the unconscious mind and emotional depths.",
            "Flowing water may represent the passage of time or emotional release.",
            "Still waters might reflect inner peace or hidden emotions beneath the surface.",
        ],
    ),
    (
        "Flying",
        &[
            "Flight in dreams typically represents freedom, ambition, or transcendence.",
            "Soaring may indicate rising above challenges or gaining new perspective.",
            "The desire to fly often reflects aspirations and breaking free from limitations.",
        ],
    ),
    (
        "Falling",
        &[
            "Falling can symbolize loss of control, fear of failure, or vulnerability.",
            "This dream may reflect anxiety about a situation in waking life.",
            "Consider what you're holding onto too tightly; sometimes letting go is necessary.",
        ],
    ),
    (
        "Chase",
        &[
            "Being chased often represents avoidance of confronting something in your life.",
            "This dream suggests there may be unresolved issues seeking your attention.",
            "Face what pursues you; it may be less fearsome than it appears.",
        ],
    ),
    (
        "Light",
        &[
            "Light symbolizes clarity, truth, hope, or spiritual awakening.",
            "Illumination in dreams often precedes understanding or revelation.",
            "You may be on the threshold of an important realization.",
        ],
    ),
    (
        "Darkness",
        &[
            "Darkness represents the unknown, hidden aspects of self, or unexplored territory.",
            "This dream invites you to explore what lies beneath conscious awareness.",
            "Within darkness, seeds of transformation quietly grow.",
        ],
    ),
    (
        "Journey",
        &[
            "Journeys symbolize life's path, personal growth, or spiritual quest.",
            "The nature of your travels reflects your current life progression.",
            "Pay attention to companions, obstacles, and destinations along the way.",
        ],
    ),
    (
        "Magic",
        &[
            "Magical elements represent untapped potential, transformation, or possibility.",
            "This dream suggests you possess powers yet to be fully realized.",
            "Trust in your ability to manifest change through intention and will.",
        ],
    ),
];

const GENERIC_READING: &str = "Dreams are the soul's language, speaking in symbols beyond ordinary words. Each image holds meaning unique to your journey.";

const EMOTION_READINGS: &[(&str, &str)] = &[
    ("Peaceful", "The serene quality of this dream suggests inner harmony and alignment with your true self."),
    ("Joyful", "The joy present here may be calling you to embrace more lightness in your waking life."),
    ("Anxious", "Anxiety in dreams often amplifies concerns that need gentle attention and resolution."),
    ("Fearful", "Fear in dreams can be a protective messenger, highlighting what requires courage to face."),
    ("Melancholic", "Sadness in dreams may signal a need for closure, healing, or honoring what has passed."),
    ("Curious", "Your curiosity is a guiding light. Follow it toward discovery and growth."),
    ("Powerful", "This dream reflects your innate strength and capacity to shape your reality."),
    ("Confused", "Confusion often precedes clarity. Trust that understanding will emerge in time."),
    ("Mysterious", "Some dreams resist interpretation, preferring to work their magic quietly within."),
];

static SYMBOL_REGEXES: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile_table(SYMBOL_PATTERNS.iter().copied()));

static EMOTION_REGEXES: LazyLock<Vec<((&'static str, u32), Regex)>> = LazyLock::new(|| {
    compile_table(
        EMOTION_PATTERNS
            .iter()
            .map(|(name, pattern, weight)| ((*name, *weight), *pattern)),
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamInsight {
    pub emotion: String,
    pub keywords: Vec<String>,
    pub interpretation: String,
}

/// Symbol names found in `text`, in declaration order, at most [`MAX_KEYWORDS`].
pub fn extract_keywords(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase();

    SYMBOL_REGEXES
        .iter()
        .filter(|(_, regex)| regex.is_match(&normalized))
        .map(|(name, _)| (*name).to_string())
        .take(MAX_KEYWORDS)
        .collect()
}

/// Highest weighted emotion. The first emotion to reach the top score keeps it.
pub fn detect_emotion(text: &str) -> String {
    let normalized = text.to_lowercase();

    let (emotion, _) = EMOTION_REGEXES.iter().fold(
        (DEFAULT_EMOTION, 0_u32),
        |(best, best_score), ((name, weight), regex)| {
            let score = u32::from(regex.is_match(&normalized)) * weight;
            if score > best_score {
                (*name, score)
            } else {
                (best, best_score)
            }
        },
    );

    emotion.to_string()
}

pub fn interpret<R: Rng>(text: &str, rng: &mut R) -> DreamInsight {
    let keywords = extract_keywords(text);
    let emotion = detect_emotion(text);
    let interpretation = generate_interpretation(&keywords, &emotion, rng);

    DreamInsight {
        emotion,
        keywords,
        interpretation,
    }
}

/// Two sentences: a reading of the first keyword, then one for the emotion.
pub fn generate_interpretation<R: Rng>(keywords: &[String], emotion: &str, rng: &mut R) -> String {
    let main = keywords
        .first()
        .and_then(|primary| {
            SYMBOL_READINGS
                .iter()
                .find(|(name, _)| *name == primary.as_str())
                .and_then(|(_, readings)| readings.choose(rng))
        })
        .copied()
        .unwrap_or(GENERIC_READING);

    let insight = lookup(EMOTION_READINGS, emotion)
        .or_else(|| lookup(EMOTION_READINGS, DEFAULT_EMOTION))
        .unwrap_or_default();

    format!("{main} {insight}")
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}
