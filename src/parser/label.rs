//! Label helpers and per-parse compiled patterns.
//!
//! Massif labels look like `0x6F675AB: some::function(args) (file.cpp:123)`.
//! The decoder only needs the bare function portion to test entries against
//! the user's custom-allocator patterns; everything else about label
//! presentation belongs to consumers.

use crate::utils::config::BELOW_THRESHOLD_PATTERN;
use regex::Regex;

/// Strip the leading `address: ` prefix from a label, if present
pub fn pretty_label(label: &str) -> &str {
    match label.find(": ") {
        Some(pos) => &label[pos + 2..],
        None => label,
    }
}

/// Extract the function portion of a label: the text after any leading
/// `address: ` prefix and before any trailing ` (location)` suffix.
pub fn function_in_label(label: &str) -> &str {
    let pretty = pretty_label(label);
    match pretty.rfind(" (") {
        Some(pos) => &pretty[..pos],
        None => pretty,
    }
}

/// Patterns compiled once per parse invocation and passed explicitly,
/// keeping the parser free of global regex state.
pub(crate) struct PatternSet {
    allocators: Vec<Regex>,
    below_threshold: Regex,
}

impl PatternSet {
    /// Compile the caller's wildcard allocator patterns.
    ///
    /// Patterns use shell-style wildcards (`*` matches any run, `?` one
    /// character) and must match the whole function name.
    pub(crate) fn new(custom_allocators: &[String]) -> Self {
        let allocators = custom_allocators
            .iter()
            .filter_map(|pattern| Regex::new(&wildcard_to_regex(pattern)).ok())
            .collect();
        let below_threshold =
            Regex::new(BELOW_THRESHOLD_PATTERN).expect("below-threshold pattern is a valid regex");
        Self {
            allocators,
            below_threshold,
        }
    }

    /// Does `function` name one of the user's custom allocators?
    pub(crate) fn is_custom_allocator(&self, function: &str) -> bool {
        self.allocators.iter().any(|re| re.is_match(function))
    }

    /// Matcher for "in N places, all below threshold" bucket labels
    pub(crate) fn below_threshold(&self) -> &Regex {
        &self.below_threshold
    }
}

/// Translate a shell-style wildcard pattern into an anchored regex
fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_function_from_full_label() {
        let label = "0x6F675AB: KDevelop::IndexedIdentifier::IndexedIdentifier(KDevelop::Identifier const&) (identifier.cpp:1050)";
        assert_eq!(
            pretty_label(label),
            "KDevelop::IndexedIdentifier::IndexedIdentifier(KDevelop::Identifier const&) (identifier.cpp:1050)"
        );
        assert_eq!(
            function_in_label(label),
            "KDevelop::IndexedIdentifier::IndexedIdentifier(KDevelop::Identifier const&)"
        );
    }

    #[test]
    fn extracts_function_without_location() {
        assert_eq!(
            function_in_label("0x6F675AB: moz_xmalloc (mozalloc.cpp:98)"),
            "moz_xmalloc"
        );
        assert_eq!(function_in_label("plain_label"), "plain_label");
    }

    #[test]
    fn wildcard_patterns_match_whole_function() {
        let patterns = PatternSet::new(&["my_alloc*".to_string(), "pool_?lloc".to_string()]);
        assert!(patterns.is_custom_allocator("my_alloc"));
        assert!(patterns.is_custom_allocator("my_allocate_aligned"));
        assert!(patterns.is_custom_allocator("pool_alloc"));
        assert!(!patterns.is_custom_allocator("not_my_alloc"));
        assert!(!patterns.is_custom_allocator("pool_alloc_extra"));
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        let patterns = PatternSet::new(&["operator new(unsigned long)".to_string()]);
        assert!(patterns.is_custom_allocator("operator new(unsigned long)"));
        assert!(!patterns.is_custom_allocator("operator newXunsigned longY"));
    }

    #[test]
    fn below_threshold_matches_both_wordings() {
        let patterns = PatternSet::new(&[]);
        let re = patterns.below_threshold();
        let caps = re
            .captures("in 42 places, all below threshold")
            .expect("plain wording");
        assert_eq!(&caps[1], "42");
        assert!(re.is_match("in 7 places, all below massif's threshold (1.00%)"));
    }
}
