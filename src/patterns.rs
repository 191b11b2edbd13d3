use regex::Regex;
use tracing::warn;

/// Compiles a built-in pattern. A pattern that fails is logged and skipped by callers.
pub fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .inspect_err(|error| warn!(pattern, error = %error, "skipping invalid built-in pattern"))
        .ok()
}

/// Compiles `(key, pattern)` pairs, keeping declaration order and dropping invalid patterns.
pub fn compile_table<K, P>(patterns: impl IntoIterator<Item = (K, P)>) -> Vec<(K, Regex)>
where
    P: AsRef<str>,
{
    patterns
        .into_iter()
        .filter_map(|(key, pattern)| compile(pattern.as_ref()).map(|regex| (key, regex)))
        .collect()
}

/// `text` with every match replaced (`$n` groups expand); unchanged when the pattern is missing.
pub fn replace_all(regex: &Option<Regex>, text: &str, replacement: &str) -> String {
    regex.as_ref().map_or_else(
        || text.to_string(),
        |regex| regex.replace_all(text, replacement).into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::{compile, compile_table, replace_all};

    #[test]
    fn invalid_patterns_are_dropped_in_order() {
        let table = compile_table([("a", "x+"), ("broken", "(unclosed"), ("b", "y")]);
        let keys = table.iter().map(|(key, _)| *key).collect::<Vec<_>>();

        assert_eq!(keys, vec!["a", "b"]);
        assert!(compile("[").is_none());
    }

    #[test]
    fn missing_pattern_leaves_text_alone() {
        let spaces = compile(r"\s+");

        assert_eq!(replace_all(&spaces, "a   b", " "), "a b");
        assert_eq!(replace_all(&None, "a   b", " "), "a   b");
    }
}
