//! Property-based tests for link rewriting invariants
//!
//! These tests use `proptest` to check the rewriter against randomly
//! generated documents rather than hand-picked examples.

use super::*;
use proptest::prelude::*;

// Display text: no brackets, at least one character
fn display_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _-]{1,12}".prop_map(|s| s.to_string())
}

// Link target tail: no close paren
fn target_tail_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9./#_-]{0,24}".prop_map(|s| s.to_string())
}

// Prose with no link syntax at all
fn prose_strategy() -> impl Strategy<Value = String> {
    "[^\\[\\]()!]{0,40}".prop_map(|s| s.to_string())
}

fn space_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9.]{0,10}".prop_map(|s| s.to_string())
}

proptest! {
    #[test]
    fn prop_text_without_brackets_unchanged(
        text in "[^\\[]{0,200}",
        space in space_strategy()
    ) {
        prop_assert_eq!(rewrite(&text, &space), text);
    }

    #[test]
    fn prop_absolute_links_unchanged(
        display in display_strategy(),
        prefix in prop::sample::select(ABSOLUTE_PREFIXES.to_vec()),
        tail in target_tail_strategy(),
        space in space_strategy()
    ) {
        let link = format!("[{}]({}{})", display, prefix, tail);
        prop_assert_eq!(rewrite(&link, &space), link);
    }

    #[test]
    fn prop_images_unchanged(
        alt in display_strategy(),
        target in "[a-z0-9./#_-]{1,24}",
        space in space_strategy()
    ) {
        let image = format!("![{}]({})", alt, target);
        prop_assert_eq!(rewrite(&image, &space), image);
    }

    #[test]
    fn prop_link_after_unclosed_image_marker_rewritten(
        alt in display_strategy(),
        display in display_strategy(),
        file in "[a-z0-9-]{1,12}\\.md",
        space in space_strategy()
    ) {
        let text = format!("![{} [{}]({})", alt, display, file);
        let expected = format!("![{} [[{}>>doc:{}.{}]]", alt, display, space, page_name(&file));
        prop_assert_eq!(rewrite(&text, &space), expected);
    }

    #[test]
    fn prop_surrounding_text_preserved(
        before in prose_strategy(),
        after in prose_strategy(),
        display in display_strategy(),
        file in "[a-z0-9-]{1,12}\\.md",
        space in space_strategy()
    ) {
        let text = format!("{}[{}]({}){}", before, display, file, after);
        let output = rewrite(&text, &space);
        let expected_link = format!("[[{}>>doc:{}.{}]]", display, space, page_name(&file));

        prop_assert!(output.starts_with(&before));
        prop_assert!(output.ends_with(&after));
        prop_assert_eq!(output, format!("{}{}{}", before, expected_link, after));
    }

    #[test]
    fn prop_page_name_is_pure_and_directory_free(path in "[a-z0-9./_-]{1,40}") {
        let name = page_name(&path);

        prop_assert_eq!(name, page_name(&path));
        prop_assert!(!name.contains('/'));
        prop_assert!(path.contains(name));
    }

    #[test]
    fn prop_stats_match_rewritten_links(
        files in prop::collection::vec("[a-z]{1,8}\\.md", 0..6),
        space in space_strategy()
    ) {
        let text = files
            .iter()
            .map(|f| format!("[{}]({})", f, f))
            .collect::<Vec<_>>()
            .join(" | ");
        let (output, stats) = rewrite_with_stats(&text, &space);

        prop_assert_eq!(stats.cross_file, files.len());
        prop_assert_eq!(output.matches(">>doc:").count(), files.len());
    }
}
