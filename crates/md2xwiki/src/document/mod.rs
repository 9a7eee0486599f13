//! Document handling
//!
//! The link rewriter turns inline Markdown links into XWiki links. Format
//! adapters decide which files are documents and route them to the rewriter.

mod adapter;
mod link_rewriter;

pub use adapter::{AdapterRegistry, DocFormatAdapter, MarkdownAdapter, DEFAULT_EXTENSIONS};
pub use link_rewriter::{
    page_name, rewrite, rewrite_with_stats, LinkTarget, RewriteStats, ABSOLUTE_PREFIXES,
};
