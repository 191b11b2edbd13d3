use crate::journal::model::Category;

const NIGHTMARE_KEYWORDS: &[&str] = &[
    "fear", "scared", "terror", "nightmare", "dark", "chase", "run", "escape", "death", "blood",
    "scream", "monster", "danger", "trap", "haunting", "panic", "dread",
];

const SERENE_KEYWORDS: &[&str] = &[
    "peace", "calm", "gentle", "soft", "beautiful", "garden", "flower", "meadow", "sunshine",
    "love", "warm", "comfort", "safe", "tranquil", "serene", "quiet", "relaxed", "happy",
];

const EPIC_KEYWORDS: &[&str] = &[
    "battle", "adventure", "quest", "journey", "hero", "fight", "victory", "magic", "power",
    "kingdom", "warrior", "legend", "sword", "dragon", "epic", "grand", "destiny",
];

/// Keyword scores behind a categorization, one per indicator list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScores {
    pub nightmare: usize,
    pub serene: usize,
    pub epic: usize,
}

impl CategoryScores {
    pub fn of(content: &str) -> Self {
        let normalized = content.to_lowercase();

        Self {
            nightmare: count_keywords(&normalized, NIGHTMARE_KEYWORDS),
            serene: count_keywords(&normalized, SERENE_KEYWORDS),
            epic: count_keywords(&normalized, EPIC_KEYWORDS),
        }
    }

    /// A category wins only by strictly beating both other scores.
    pub fn category(self) -> Category {
        let Self {
            nightmare,
            serene,
            epic,
        } = self;

        if nightmare > serene && nightmare > epic {
            Category::Nightmare
        } else if epic > serene && epic > nightmare {
            Category::Epic
        } else if serene > nightmare && serene > epic {
            Category::Serene
        } else {
            Category::Strange
        }
    }
}

pub fn categorize(content: &str) -> Category {
    CategoryScores::of(content).category()
}

fn count_keywords(normalized: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| normalized.contains(*keyword))
        .count()
}
