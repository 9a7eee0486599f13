//! Markdown to XWiki link conversion library
//!
//! The core is [`document::rewrite`], a pure function that turns inline
//! Markdown links into XWiki links under a given space. The [`converter`]
//! module applies it to a directory of documents; the binary wraps that in
//! a command-line interface.

pub mod cli;
pub mod config;
pub mod converter;
pub mod document;
pub mod errors;
pub mod output;

// Re-export commonly used types
pub use converter::{ConversionOptions, ConversionReport, ConvertedFile, Converter};
pub use document::{page_name, rewrite, rewrite_with_stats, LinkTarget, RewriteStats};
pub use errors::{ActionableError, ConvertError};
pub use output::{ExitCode, JsonError, JsonOutput, OutputContext};
