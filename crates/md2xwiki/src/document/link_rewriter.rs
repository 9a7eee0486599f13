//! Markdown to XWiki inline link rewriting
//!
//! Scans text for inline Markdown links (`[text](target)`), classifies each
//! target and re-emits it in XWiki link syntax. Everything that is not an
//! eligible link is copied through byte-for-byte.
//!
//! | Markdown                  | XWiki                                         |
//! |---------------------------|-----------------------------------------------|
//! | `[text](file.md)`         | `[[text>>doc:Space.file]]`                    |
//! | `[text](file.md#section)` | `[[text>>doc:Space.file\|\|anchor="section"]]` |
//! | `[text](#section)`        | `[[text>>doc:\|\|anchor="section"]]`           |
//! | `[text](https://...)`     | unchanged                                     |
//! | `![alt](image.png)`       | unchanged                                     |

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Target prefixes that mark a link as absolute. Absolute links are kept as-is.
pub const ABSOLUTE_PREFIXES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Regex for an inline link: `[display](target)`
///
/// - display: one or more characters other than `]`
/// - target: one or more characters other than `)`
///
/// The image marker `!` is checked by the caller since `regex` has no lookbehind.
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Link regex should compile")
    })
}

/// Classified form of a raw link target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// External URL or mail address, kept verbatim
    Absolute(&'a str),
    /// Fragment-only target pointing into the current page
    SamePage { anchor: &'a str },
    /// Target naming another document, with an optional fragment
    CrossFile {
        file: &'a str,
        anchor: Option<&'a str>,
    },
    /// No file and no fragment
    Empty,
}

impl<'a> LinkTarget<'a> {
    /// Classify a raw target string.
    ///
    /// The target is split on the first `#`. An empty fragment after `#` still
    /// counts as a fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use md2xwiki::document::LinkTarget;
    ///
    /// assert_eq!(
    ///     LinkTarget::parse("guide.md#install"),
    ///     LinkTarget::CrossFile { file: "guide.md", anchor: Some("install") }
    /// );
    /// assert_eq!(LinkTarget::parse("#top"), LinkTarget::SamePage { anchor: "top" });
    /// assert_eq!(
    ///     LinkTarget::parse("https://example.com"),
    ///     LinkTarget::Absolute("https://example.com")
    /// );
    /// ```
    pub fn parse(raw: &'a str) -> Self {
        if ABSOLUTE_PREFIXES
            .iter()
            .any(|prefix| raw.starts_with(prefix))
        {
            return LinkTarget::Absolute(raw);
        }

        let (file, anchor) = match raw.split_once('#') {
            Some((file, anchor)) => (file, Some(anchor)),
            None => (raw, None),
        };

        match (file.is_empty(), anchor) {
            (true, None) => LinkTarget::Empty,
            (true, Some(anchor)) => LinkTarget::SamePage { anchor },
            (false, anchor) => LinkTarget::CrossFile { file, anchor },
        }
    }

    /// Render this target as an XWiki link with the given display text.
    ///
    /// Returns `None` for targets that are left unchanged (absolute and empty),
    /// in which case the caller keeps the original Markdown span.
    pub fn render(&self, display: &str, space: &str) -> Option<String> {
        match *self {
            LinkTarget::Absolute(_) | LinkTarget::Empty => None,
            LinkTarget::SamePage { anchor } => {
                Some(format!("[[{}>>doc:||anchor=\"{}\"]]", display, anchor))
            }
            LinkTarget::CrossFile { file, anchor: None } => Some(format!(
                "[[{}>>doc:{}.{}]]",
                display,
                space,
                page_name(file)
            )),
            LinkTarget::CrossFile {
                file,
                anchor: Some(anchor),
            } => Some(format!(
                "[[{}>>doc:{}.{}||anchor=\"{}\"]]",
                display,
                space,
                page_name(file),
                anchor
            )),
        }
    }
}

/// Derive an XWiki page name from the file part of a link target.
///
/// Drops any directory prefix and the last extension. Names without an
/// extension (including dot-files such as `.profile`) are kept whole.
///
/// # Examples
///
/// ```
/// use md2xwiki::document::page_name;
///
/// assert_eq!(page_name("01-setup.md"), "01-setup");
/// assert_eq!(page_name("a/b/c.md"), "c");
/// assert_eq!(page_name("noext"), "noext");
/// ```
pub fn page_name(file_part: &str) -> &str {
    let trimmed = file_part.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);

    if base.bytes().all(|b| b == b'.') {
        return base;
    }

    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    }
}

/// Per-document tally of what the rewriter did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Links to other documents that were rewritten
    pub cross_file: usize,
    /// Same-page anchor links that were rewritten
    pub same_page: usize,
    /// Absolute links left untouched
    pub absolute: usize,
    /// Links with neither file nor anchor, left untouched
    pub empty_target: usize,
    /// Image embeds left untouched
    pub images: usize,
}

impl RewriteStats {
    /// Number of links that were converted to XWiki syntax
    pub fn rewritten(&self) -> usize {
        self.cross_file + self.same_page
    }

    /// Add another tally into this one
    pub fn merge(&mut self, other: &RewriteStats) {
        self.cross_file += other.cross_file;
        self.same_page += other.same_page;
        self.absolute += other.absolute;
        self.empty_target += other.empty_target;
        self.images += other.images;
    }

    fn record(&mut self, target: &LinkTarget<'_>) {
        match target {
            LinkTarget::Absolute(_) => self.absolute += 1,
            LinkTarget::SamePage { .. } => self.same_page += 1,
            LinkTarget::CrossFile { .. } => self.cross_file += 1,
            LinkTarget::Empty => self.empty_target += 1,
        }
    }
}

/// Rewrite every eligible inline link in `text` into XWiki syntax.
///
/// Never fails: anything that does not match the link grammar, or matches but
/// is not eligible, is passed through unchanged.
///
/// # Examples
///
/// ```
/// use md2xwiki::document::rewrite;
///
/// assert_eq!(
///     rewrite("[Setup](01-setup.md)", "MySpace"),
///     "[[Setup>>doc:MySpace.01-setup]]"
/// );
/// ```
pub fn rewrite(text: &str, space: &str) -> String {
    rewrite_with_stats(text, space).0
}

/// Same as [`rewrite`], also returning a tally of the links seen.
///
/// A candidate preceded by `!` is not consumed: scanning retries one
/// character later, so a link nested in rejected display text is still found.
pub fn rewrite_with_stats(text: &str, space: &str) -> (String, RewriteStats) {
    let regex = link_regex();
    let mut stats = RewriteStats::default();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = regex.captures_at(text, pos) {
        let Some(span) = caps.get(0) else { break };

        // `!` is ASCII, so a byte check cannot land inside a multi-byte char
        if span.start() > 0 && text.as_bytes()[span.start() - 1] == b'!' {
            stats.images += 1;
            // the match starts with `[`, so the next char boundary is one byte on
            pos = span.start() + 1;
            continue;
        }

        out.push_str(&text[copied..span.start()]);
        let target = LinkTarget::parse(&caps[2]);
        stats.record(&target);
        match target.render(&caps[1], space) {
            Some(link) => out.push_str(&link),
            None => out.push_str(span.as_str()),
        }
        copied = span.end();
        pos = span.end();
    }

    out.push_str(&text[copied..]);
    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_file_link() {
        assert_eq!(
            rewrite("[Setup](01-setup.md)", "MySpace"),
            "[[Setup>>doc:MySpace.01-setup]]"
        );
    }

    #[test]
    fn test_cross_file_link_with_anchor() {
        assert_eq!(
            rewrite("[Section](01-setup.md#install)", "MySpace"),
            "[[Section>>doc:MySpace.01-setup||anchor=\"install\"]]"
        );
    }

    #[test]
    fn test_same_page_anchor() {
        assert_eq!(
            rewrite("[Jump](#top)", "Anything"),
            "[[Jump>>doc:||anchor=\"top\"]]"
        );
    }

    #[test]
    fn test_same_page_anchor_ignores_space() {
        assert_eq!(rewrite("[Jump](#top)", "A"), rewrite("[Jump](#top)", "B"));
    }

    #[test]
    fn test_empty_anchor_is_still_an_anchor() {
        assert_eq!(rewrite("[Top](#)", "S"), "[[Top>>doc:||anchor=\"\"]]");
        assert_eq!(
            rewrite("[Doc](doc.md#)", "S"),
            "[[Doc>>doc:S.doc||anchor=\"\"]]"
        );
    }

    #[test]
    fn test_absolute_links_unchanged() {
        for text in [
            "[External](https://example.com)",
            "[Plain](http://example.com/a.md#x)",
            "[Mail](mailto:someone@example.com)",
        ] {
            assert_eq!(rewrite(text, "MySpace"), text);
        }
    }

    #[test]
    fn test_image_unchanged() {
        assert_eq!(rewrite("![Diagram](img.png)", "S"), "![Diagram](img.png)");
        assert_eq!(
            rewrite("![Diagram](other.md#x)", "S"),
            "![Diagram](other.md#x)"
        );
    }

    #[test]
    fn test_two_links_on_one_line() {
        assert_eq!(
            rewrite("[A](a.md) and [B](b.md)", "S"),
            "[[A>>doc:S.a]] and [[B>>doc:S.b]]"
        );
    }

    #[test]
    fn test_image_next_to_link() {
        assert_eq!(
            rewrite("![Logo](logo.png)[Home](index.md)", "S"),
            "![Logo](logo.png)[[Home>>doc:S.index]]"
        );
    }

    #[test]
    fn test_link_inside_rejected_image_text_is_rewritten() {
        assert_eq!(
            rewrite("![[Home](index.md)", "S"),
            "![[[Home>>doc:S.index]]"
        );
        assert_eq!(rewrite("![a [b](c.md)", "S"), "![a [[b>>doc:S.c]]");
    }

    #[test]
    fn test_rejected_image_counted_once_per_marker() {
        let (output, stats) = rewrite_with_stats("![a [b](c.md) ![d](e.png)", "S");
        assert_eq!(output, "![a [[b>>doc:S.c]] ![d](e.png)");
        assert_eq!(stats.cross_file, 1);
        assert_eq!(stats.images, 2);
    }

    #[test]
    fn test_text_without_links_unchanged() {
        let text = "# Title\n\nNo links [here] or (there), just text.\n";
        assert_eq!(rewrite(text, "S"), text);
        assert_eq!(rewrite("", "S"), "");
    }

    #[test]
    fn test_empty_display_or_target_not_matched() {
        assert_eq!(rewrite("[](a.md)", "S"), "[](a.md)");
        assert_eq!(rewrite("[A]()", "S"), "[A]()");
        assert_eq!(rewrite("[A] (a.md)", "S"), "[A] (a.md)");
    }

    #[test]
    fn test_target_stops_at_first_close_paren() {
        assert_eq!(
            rewrite("[Wiki](page_(disambiguation).md)", "S"),
            "[[Wiki>>doc:S.page_(disambiguation]].md)"
        );
    }

    #[test]
    fn test_directory_prefix_dropped_from_page_name() {
        assert_eq!(
            rewrite("[Deep](../guides/setup/install.md#linux)", "Docs"),
            "[[Deep>>doc:Docs.install||anchor=\"linux\"]]"
        );
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let input = "Intro 📘 see [Setup](01-setup.md), then [Jump](#top).\n\n- item";
        let expected =
            "Intro 📘 see [[Setup>>doc:S.01-setup]], then [[Jump>>doc:||anchor=\"top\"]].\n\n- item";
        assert_eq!(rewrite(input, "S"), expected);
    }

    #[test]
    fn test_page_name_derivation() {
        assert_eq!(page_name("01-setup.md"), "01-setup");
        assert_eq!(page_name("index.md"), "index");
        assert_eq!(page_name("noext"), "noext");
        assert_eq!(page_name("a/b/c.md"), "c");
        assert_eq!(page_name("archive.tar.gz"), "archive.tar");
        assert_eq!(page_name(".profile"), ".profile");
        assert_eq!(page_name("dir\\file.md"), "file");
        assert_eq!(page_name("a/b/"), "b");
        assert_eq!(page_name(".."), "..");
    }

    #[test]
    fn test_parse_classification() {
        assert_eq!(LinkTarget::parse(""), LinkTarget::Empty);
        assert_eq!(
            LinkTarget::parse("mailto:a@b.c"),
            LinkTarget::Absolute("mailto:a@b.c")
        );
        assert_eq!(
            LinkTarget::parse("a.md#x#y"),
            LinkTarget::CrossFile {
                file: "a.md",
                anchor: Some("x#y")
            }
        );
        assert_eq!(
            LinkTarget::parse("ftp://host/file.md"),
            LinkTarget::CrossFile {
                file: "ftp://host/file.md",
                anchor: None
            }
        );
    }

    #[test]
    fn test_render_empty_target_keeps_original() {
        assert_eq!(LinkTarget::Empty.render("x", "S"), None);
    }

    #[test]
    fn test_stats_tally() {
        let text = "[A](a.md) [B](#b) [C](https://c.io) ![D](d.png) [E](e.md#e)";
        let (_, stats) = rewrite_with_stats(text, "S");
        assert_eq!(
            stats,
            RewriteStats {
                cross_file: 2,
                same_page: 1,
                absolute: 1,
                empty_target: 0,
                images: 1,
            }
        );
        assert_eq!(stats.rewritten(), 3);
    }

    #[test]
    fn test_stats_merge() {
        let mut total = RewriteStats {
            cross_file: 1,
            ..Default::default()
        };
        total.merge(&RewriteStats {
            cross_file: 2,
            same_page: 1,
            images: 4,
            ..Default::default()
        });
        assert_eq!(total.cross_file, 3);
        assert_eq!(total.same_page, 1);
        assert_eq!(total.images, 4);
    }
}

#[cfg(test)]
#[path = "link_rewriter_proptests.rs"]
mod proptests;
