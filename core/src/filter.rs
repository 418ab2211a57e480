//! Shell-glob name filter for folder listings.
//!
//! Supports two wildcards: `?` (any single character) and `*` (any run of
//! characters, including empty). Everything else matches literally, so a
//! pattern like `a(b)c` matches only the name `a(b)c`.

use regex::Regex;

use crate::model::FileSystemElement;

/// Compiled name-matching predicate. An absent pattern accepts everything.
#[derive(Debug, Clone)]
pub struct Filter {
    pattern: Option<Regex>,
}

impl Filter {
    /// Accept-all filter.
    pub fn all() -> Self {
        Self { pattern: None }
    }

    /// Compile a glob pattern into a full-match predicate.
    pub fn from_glob(glob: &str) -> Self {
        Self {
            pattern: Some(glob_to_regex(glob)),
        }
    }

    /// Build from an optional query parameter.
    pub fn from_option(glob: Option<&str>) -> Self {
        match glob {
            Some(g) => Self::from_glob(g),
            None => Self::all(),
        }
    }

    /// Whether the element's name matches the pattern.
    pub fn accept(&self, element: &FileSystemElement) -> bool {
        self.accept_name(element.name())
    }

    pub fn accept_name(&self, name: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(name),
            None => true,
        }
    }
}

/// Translate a glob into an anchored regex: escape metacharacters first,
/// then substitute the two wildcards.
fn glob_to_regex(glob: &str) -> Regex {
    let mut translated = String::with_capacity(glob.len() + 4);
    translated.push('^');
    for c in glob.chars() {
        match c {
            '?' => translated.push('.'),
            '*' => translated.push_str(".*"),
            '.' | '(' | ')' | '{' | '}' | '|' | '^' | '$' | '[' | ']' | '\\' | '+' => {
                translated.push('\\');
                translated.push(c);
            }
            _ => translated.push(c),
        }
    }
    translated.push('$');
    // Every metacharacter is escaped above, so the translation is always a
    // valid expression.
    Regex::new(&translated).expect("escaped glob compiles")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_pattern_accepts_everything() {
        let filter = Filter::all();
        assert!(filter.accept_name("anything.txt"));
        assert!(filter.accept_name(""));
    }

    #[test]
    fn star_matches_any_run() {
        let filter = Filter::from_glob("*.xml");
        assert!(filter.accept_name("test.xml"));
        assert!(filter.accept_name(".xml"));
        assert!(!filter.accept_name("test.xml.bak"));
        assert!(!filter.accept_name("testxml"));
    }

    #[test]
    fn question_mark_matches_exactly_one_char() {
        let filter = Filter::from_glob("a?c");
        assert!(filter.accept_name("abc"));
        assert!(!filter.accept_name("ac"));
        assert!(!filter.accept_name("abbc"));
    }

    #[test]
    fn match_is_full_not_substring() {
        let filter = Filter::from_glob("file");
        assert!(filter.accept_name("file"));
        assert!(!filter.accept_name("file1"));
        assert!(!filter.accept_name("myfile"));
    }

    #[test]
    fn metacharacters_match_literally() {
        let filter = Filter::from_glob("a(b)c");
        assert!(filter.accept_name("a(b)c"));
        assert!(!filter.accept_name("abc"));

        let filter = Filter::from_glob("a.b");
        assert!(filter.accept_name("a.b"));
        assert!(!filter.accept_name("axb"));

        let filter = Filter::from_glob("x[1]$");
        assert!(filter.accept_name("x[1]$"));
        assert!(!filter.accept_name("x1"));
    }

    #[test]
    fn wildcards_combine_with_literals() {
        let filter = Filter::from_glob("report-??.*");
        assert!(filter.accept_name("report-01.csv"));
        assert!(filter.accept_name("report-ab.tar.gz"));
        assert!(!filter.accept_name("report-1.csv"));
    }
}
