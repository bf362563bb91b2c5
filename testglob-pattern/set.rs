use crate::{Dashes, NEVER_MATCH, RegexCompileError, compile};

/// A whitespace-separated list of wildcard patterns, compiled into a single
/// regex that matches a name when any of the patterns matches all of it.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Box<str>,
    dashes: Dashes,
    /// `None` when the set fell back to matching nothing.
    regex: Option<regex::Regex>,
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns && self.dashes == other.dashes
    }
}

impl Eq for PatternSet {}

impl std::hash::Hash for PatternSet {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.patterns.hash(state);
        self.dashes.hash(state);
    }
}

/// Compiles each whitespace-separated pattern and joins the fragments with
/// `|`.
///
/// A list without any pattern in it compiles as the single empty pattern,
/// which matches only the empty string.
#[must_use]
pub fn compile_alternation(patterns: &str, dashes: Dashes) -> String {
    let fragments = patterns
        .split_whitespace()
        .map(|pattern| compile(pattern, dashes))
        .collect::<Vec<_>>();

    if fragments.is_empty() {
        compile("", dashes)
    } else {
        fragments.join("|")
    }
}

impl PatternSet {
    pub fn new(patterns: &str, dashes: Dashes) -> Result<Self, RegexCompileError> {
        let regex_pattern = format!("^(?:{})$", compile_alternation(patterns, dashes));
        let regex = regex::RegexBuilder::new(&regex_pattern)
            .build()
            .map_err(|source| RegexCompileError {
                patterns: patterns.to_owned(),
                regex: regex_pattern.clone(),
                source,
            })?;

        tracing::trace!("compiled pattern set `{patterns}` to {:?}", regex.as_str());

        Ok(Self {
            patterns: patterns.into(),
            dashes,
            regex: Some(regex),
        })
    }

    /// Like [`PatternSet::new`], but a regex the engine rejects is logged and
    /// replaced by a set that matches nothing.
    #[must_use]
    pub fn new_or_never(patterns: &str, dashes: Dashes) -> Self {
        Self::new(patterns, dashes).unwrap_or_else(|err| {
            tracing::error!("{err}: {}; the pattern set will match nothing", err.source);
            Self {
                patterns: patterns.into(),
                dashes,
                regex: None,
            }
        })
    }

    /// True if `name` as a whole matches one of the patterns.
    #[inline]
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(name))
    }

    /// The patterns as written, before compilation.
    #[inline]
    #[must_use]
    pub fn patterns(&self) -> &str {
        &self.patterns
    }

    #[inline]
    #[must_use]
    pub fn dashes(&self) -> Dashes {
        self.dashes
    }

    /// The compiled regex, or `None` if compilation failed and the set
    /// matches nothing.
    #[inline]
    #[must_use]
    pub fn regex(&self) -> Option<&regex::Regex> {
        self.regex.as_ref()
    }

    /// Source of the compiled regex.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or(NEVER_MATCH, regex::Regex::as_str)
    }
}

impl std::fmt::Display for PatternSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternation() {
        assert_eq!(
            compile_alternation("test_* check_*", Dashes::Literal),
            "test_.*|check_.*"
        );
        assert_eq!(
            compile_alternation("  Test*\n\tSuite-* ", Dashes::WordBoundary),
            "Test.*|Suite[A-Z0-9].*"
        );
        assert_eq!(compile_alternation("", Dashes::Literal), "");
        assert_eq!(compile_alternation(" \n ", Dashes::Literal), "");
    }

    #[test]
    fn empty_set_matches_only_empty_string() {
        let set = PatternSet::new("", Dashes::Literal).unwrap();
        assert!(set.is_match(""));
        assert!(!set.is_match("test_a"));
    }

    #[test]
    fn rejected_regex_matches_nothing() {
        // A balanced class, but an inverted range.
        assert!(PatternSet::new("[z-a]", Dashes::Literal).is_err());
        let set = PatternSet::new_or_never("[z-a]", Dashes::Literal);
        assert_eq!(set.as_str(), NEVER_MATCH);
        assert!(set.regex().is_none());
        assert!(!set.is_match(""));
        assert!(!set.is_match("]"));
    }

    #[test]
    fn close_bracket_member_keeps_the_set_alive() {
        let set = PatternSet::new("[]a]* Test*", Dashes::WordBoundary).unwrap();
        assert!(set.regex().is_some());
        assert!(set.is_match("TestFoo"));
        assert!(set.is_match("]x"));
        assert!(set.is_match("ax"));
        assert!(!set.is_match("bx"));
    }

    #[test]
    fn equality_ignores_compiled_form() {
        let a = PatternSet::new("Test*", Dashes::WordBoundary).unwrap();
        let b = PatternSet::new_or_never("Test*", Dashes::WordBoundary);
        let c = PatternSet::new("Test*", Dashes::Literal).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Test*");
    }
}
