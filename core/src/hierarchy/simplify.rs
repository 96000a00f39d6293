use regex::Regex;

/// Normalises free-text names and descriptions into file-name friendly
/// tokens
///
/// The patterns are compiled once and owned by the [`Indexer`](super::Indexer).
#[derive(Debug, Clone)]
pub struct Simplifier {
    separators: Regex,
    disallowed: Regex,
    repeated: Regex,
    edges: Regex,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self {
            separators: Regex::new(r"[\s/^]").expect("Failed to compile regex"),
            disallowed: Regex::new(r"[^A-Za-z0-9_-]").expect("Failed to compile regex"),
            repeated: Regex::new(r"_{2,}").expect("Failed to compile regex"),
            edges: Regex::new(r"^_+|_+$").expect("Failed to compile regex"),
        }
    }

    /// Simplifies a person name
    ///
    /// Every space, `/` or `^` becomes `_`, characters outside
    /// `[A-Za-z0-9_-]` are dropped, runs of `_` collapse to one and leading
    /// or trailing `_` are trimmed. Idempotent.
    ///
    /// ```
    /// use dcmdiff_core::hierarchy::Simplifier;
    ///
    /// let simplifier = Simplifier::new();
    /// assert_eq!(simplifier.name(" __a^ b^__ "), "a_b");
    /// assert_eq!(simplifier.name("surname^firstname"), "surname_firstname");
    /// ```
    pub fn name(&self, text: &str) -> String {
        let s = self.separators.replace_all(text, "_");
        let s = self.disallowed.replace_all(&s, "");
        let s = self.repeated.replace_all(&s, "_");
        self.edges.replace_all(&s, "").into_owned()
    }

    /// Simplifies a study or series description
    ///
    /// Same separator and character rules as [`Simplifier::name`], but
    /// repeated and edge underscores are left alone. Existing report file
    /// names depend on this difference.
    ///
    /// ```
    /// use dcmdiff_core::hierarchy::Simplifier;
    ///
    /// let simplifier = Simplifier::new();
    /// assert_eq!(simplifier.description(" __a^ b^__ "), "___a__b____");
    /// ```
    pub fn description(&self, text: &str) -> String {
        let s = self.separators.replace_all(text, "_");
        self.disallowed.replace_all(&s, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a", "a")]
    #[case("a_b", "a_b")]
    #[case(" __a^ b^__ ", "a_b")]
    #[case(",.;:=%_&()_+-a", "-a")]
    #[case("surname^firstname", "surname_firstname")]
    #[case("a_!_b", "a_b")]
    #[case("", "")]
    fn test_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Simplifier::new().name(input), expected);
    }

    #[rstest]
    #[case("a", "a")]
    #[case("a_b", "a_b")]
    #[case(" __a^ b^__ ", "___a__b____")]
    #[case(",.;:=%^&()_+-a", "__-a")]
    #[case("Study A", "Study_A")]
    #[case("T1 / MPRAGE", "T1___MPRAGE")]
    fn test_description(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Simplifier::new().description(input), expected);
    }

    #[rstest]
    #[case(" __a^ b^__ ")]
    #[case("a_!_b")]
    #[case("__x__y__")]
    #[case("Dr. O'Neil^Mary Ann")]
    #[case("^^^")]
    fn test_name_is_idempotent(#[case] input: &str) {
        let simplifier = Simplifier::new();
        let once = simplifier.name(input);
        assert_eq!(simplifier.name(&once), once);
    }

    #[test]
    fn test_description_is_idempotent() {
        let simplifier = Simplifier::new();
        let once = simplifier.description(" __a^ b^__ ");
        assert_eq!(simplifier.description(&once), once);
    }
}
