// tests/pattern_properties.rs

use std::path::{Path, PathBuf};

use mashwatch::config::PathMatcher;
use proptest::prelude::*;

const ROOT: &str = "/project";

// Plain directory paths: no regex metacharacters, no trailing separator.
fn literal_line() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z0-9_]{1,6}", 1..4).prop_map(|parts| parts.join("/"))
}

fn comment_or_blank_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t]{0,4}",
        "[ \t]{0,3}#[ -~]{0,20}",
    ]
}

proptest! {
    #[test]
    fn comment_and_blank_configs_compile_to_nothing(
        lines in proptest::collection::vec(comment_or_blank_line(), 0..8)
    ) {
        let matcher = PathMatcher::compile(&lines.join("\n"), Path::new(ROOT));
        prop_assert!(matcher.is_empty());
        prop_assert!(matcher.rejected().is_empty());
    }

    #[test]
    fn every_valid_line_compiles(
        lines in proptest::collection::vec(literal_line(), 0..8),
        noise in proptest::collection::vec(comment_or_blank_line(), 0..4),
    ) {
        let mut text: Vec<String> = lines.clone();
        text.extend(noise);
        let matcher = PathMatcher::compile(&text.join("\n"), Path::new(ROOT));
        prop_assert_eq!(matcher.len(), lines.len());
    }

    #[test]
    fn trailing_separator_lines_never_compile(
        good in proptest::collection::vec(literal_line(), 0..4),
        bad in proptest::collection::vec(literal_line(), 1..4),
    ) {
        let mut text: Vec<String> = good.clone();
        text.extend(bad.iter().map(|l| format!("{l}/")));
        let matcher = PathMatcher::compile(&text.join("\n"), Path::new(ROOT));

        prop_assert_eq!(matcher.len(), good.len());
        prop_assert_eq!(matcher.rejected().len(), bad.len());
        for pattern in matcher.patterns() {
            prop_assert!(!pattern.source().ends_with('/'));
        }
    }

    #[test]
    fn literal_lines_match_exactly_their_joined_path(
        lines in proptest::collection::vec(literal_line(), 1..5),
        candidate in literal_line(),
    ) {
        let matcher = PathMatcher::compile(&lines.join("\n"), Path::new(ROOT));
        let path = PathBuf::from(ROOT).join(&candidate);

        prop_assert_eq!(matcher.matches(&path), lines.contains(&candidate));
        for line in &lines {
            prop_assert!(matcher.matches(&PathBuf::from(ROOT).join(line)));
            prop_assert!(!matcher.matches(&PathBuf::from(ROOT).join(line).join("sub")));
        }
    }
}
