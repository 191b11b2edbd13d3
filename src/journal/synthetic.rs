use crate::journal::model::{Category, Entry, Tag};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

const TITLES: &[&str] = &[
    "The Staircase That Never Ended",
    "Lanterns Over the Harbor",
    "A Library Made of Rain",
    "The Clockwork Orchard",
    "Wolves Beneath the Ice",
    "The Crown in the Well",
    "Letters From a Sleeping City",
    "A Door in the Meadow",
];

const BODIES: &[&str] = &[
    "I climbed a spiral staircase that kept growing, each step humming a different note.",
    "Paper lanterns drifted over a quiet harbor while someone I loved called my name.",
    "Shelves of water held books that rippled when I touched them, and the words kept changing.",
    "Trees ticked like clocks and dropped silver fruit every hour, counting something I could not see.",
    "Something dark moved under the frozen lake and followed my footsteps to the shore.",
    "I lowered a bucket into an old well and pulled up a crown that whispered of a kingdom and a battle.",
    "The whole city was asleep except me, and every window held a letter addressed to my past.",
    "A door stood alone in a sunlit meadow, and behind it the same meadow was at night.",
];

const SYNTHETIC_WINDOW_MINUTES: i64 = 10 * 24 * 60;

/// A flagged demo entry with an empty id; the journal assigns the id.
pub fn sample_entry<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Entry {
    let title = TITLES.choose(rng).copied().unwrap_or(TITLES[0]);
    let content = BODIES.choose(rng).copied().unwrap_or(BODIES[0]);
    let category = Category::ALL
        .choose(rng)
        .copied()
        .unwrap_or(Category::Strange);

    let tag_count = rng.gen_range(0..=2);
    let tags = Tag::ALL
        .choose_multiple(rng, tag_count)
        .copied()
        .collect::<Vec<_>>();

    let minutes_ago = rng.gen_range(0..=SYNTHETIC_WINDOW_MINUTES);
    let created_at = (now - Duration::minutes(minutes_ago)).trunc_subsecs(3);

    Entry {
        id: String::new(),
        title: title.to_string(),
        content: content.to_string(),
        original_content: None,
        created_at,
        category,
        tags: Some(tags),
        is_synthetic: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::{SYNTHETIC_WINDOW_MINUTES, sample_entry};
    use chrono::{Duration, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_are_seed_reproducible() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let first = sample_entry(&mut StdRng::seed_from_u64(42), now);
        let second = sample_entry(&mut StdRng::seed_from_u64(42), now);

        assert_eq!(first, second);
        assert!(first.synthetic());
        assert!(first.tag_list().len() <= 2);
        assert!(first.created_at >= now - Duration::minutes(SYNTHETIC_WINDOW_MINUTES));
    }
}
