//! Placeholder scanning for `{{KEY}}` references.

use std::ops::Range;

use regex::Regex;

/// Pattern for a single `{{...}}` reference; the key is everything between the braces.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{([^}]+)\}\}";

/// A placeholder reference found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch<'a> {
    /// Referenced key, verbatim.
    pub key: &'a str,

    /// Byte range of the whole `{{KEY}}` match in the scanned value.
    pub span: Range<usize>,
}

impl PlaceholderMatch<'_> {
    /// Replace this match in `value` with `replacement`, taken literally.
    pub fn substitute(&self, value: &str, replacement: &str) -> String {
        let mut resolved =
            String::with_capacity(value.len() - self.span.len() + replacement.len());
        resolved.push_str(&value[..self.span.start]);
        resolved.push_str(replacement);
        resolved.push_str(&value[self.span.end..]);
        resolved
    }
}

/// Finds placeholder references in dictionary and artifact values.
#[derive(Debug, Clone)]
pub struct PlaceholderScanner {
    pattern: Regex,
}

impl Default for PlaceholderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderScanner {
    /// Create a scanner for the `{{KEY}}` syntax.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Find the first placeholder in `value`, if any.
    pub fn find<'a>(&self, value: &'a str) -> Option<PlaceholderMatch<'a>> {
        let caps = self.pattern.captures(value)?;
        let whole = caps.get(0)?;
        let key = caps.get(1)?;
        Some(PlaceholderMatch {
            key: key.as_str(),
            span: whole.range(),
        })
    }

    /// Iterate over every placeholder in `value`, left to right.
    pub fn find_all<'s, 'a>(
        &'s self,
        value: &'a str,
    ) -> impl Iterator<Item = PlaceholderMatch<'a>> + 's
    where
        'a: 's,
    {
        self.pattern.captures_iter(value).filter_map(|caps| {
            let whole = caps.get(0)?;
            let key = caps.get(1)?;
            Some(PlaceholderMatch {
                key: key.as_str(),
                span: whole.range(),
            })
        })
    }

    /// Whether `value` contains at least one placeholder.
    pub fn contains_placeholder(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    /// Whether `value` has a brace outside its placeholders or inside a placeholder key.
    ///
    /// Values without stray braces keep their placeholders intact when joined
    /// with each other; stray braces can combine into new placeholders.
    pub fn has_stray_braces(&self, value: &str) -> bool {
        let is_brace = |c: char| c == '{' || c == '}';
        let mut text_start = 0;
        for found in self.find_all(value) {
            if value[text_start..found.span.start].contains(is_brace) || found.key.contains('{') {
                return true;
            }
            text_start = found.span.end;
        }
        value[text_start..].contains(is_brace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_single_placeholder() {
        let scanner = PlaceholderScanner::new();
        let found = scanner.find("{{FOO}}").unwrap();
        assert_eq!(found.key, "FOO");
        assert_eq!(found.span, 0..7);
    }

    #[test]
    fn test_find_reports_first_only() {
        let scanner = PlaceholderScanner::new();
        let value = "{{FOO}} and {{BAR}}";
        let found = scanner.find(value).unwrap();
        assert_eq!(found.key, "FOO");
        assert_eq!(&value[found.span.clone()], "{{FOO}}");
    }

    #[test]
    fn test_key_taken_verbatim() {
        let scanner = PlaceholderScanner::new();
        assert_eq!(scanner.find("{{ foo }}").unwrap().key, " foo ");
        assert_eq!(scanner.find("x{{Foo.Bar-1}}y").unwrap().key, "Foo.Bar-1");
    }

    #[test]
    fn test_no_placeholder() {
        let scanner = PlaceholderScanner::new();
        assert!(scanner.find("plain value").is_none());
        assert!(scanner.find("{{}}").is_none());
        assert!(scanner.find("{{unclosed").is_none());
        assert!(scanner.find("{single}").is_none());
        assert!(!scanner.contains_placeholder("value-with-$"));
    }

    #[test]
    fn test_stray_braces() {
        let scanner = PlaceholderScanner::new();
        assert!(!scanner.has_stray_braces("plain"));
        assert!(!scanner.has_stray_braces("{{a}} and {{b}}"));
        assert!(scanner.has_stray_braces("{"));
        assert!(scanner.has_stray_braces("{{a}}}"));
        assert!(scanner.has_stray_braces("{{{a}}"));
        assert!(scanner.has_stray_braces("json {\"a\": 1}"));
    }

    #[test]
    fn test_find_all() {
        let scanner = PlaceholderScanner::new();
        let keys: Vec<_> = scanner
            .find_all("{{a}}{{b}} and {{c}}")
            .map(|m| m.key)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_substitute_is_literal() {
        let scanner = PlaceholderScanner::new();
        let value = "{{FOO}} and bar";
        let found = scanner.find(value).unwrap();
        assert_eq!(found.substitute(value, "$1 and $$"), "$1 and $$ and bar");
    }

    #[test]
    fn test_substitute_middle() {
        let scanner = PlaceholderScanner::new();
        let value = "a {{X}} b {{Y}}";
        let found = scanner.find(value).unwrap();
        assert_eq!(found.substitute(value, "x"), "a x b {{Y}}");
    }
}
