//! Document format adapter trait and registry
//!
//! Provides a pluggable system for deciding which source files are
//! converted and how their links are rewritten. Each format implements
//! the `DocFormatAdapter` trait.

use std::path::Path;

use super::link_rewriter::{rewrite_with_stats, RewriteStats};

/// Extensions recognized by the Markdown adapter when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Trait for document format adapters
///
/// # Example
///
/// ```
/// use md2xwiki::document::{DocFormatAdapter, MarkdownAdapter};
/// use std::path::Path;
///
/// let adapter = MarkdownAdapter::default();
/// assert_eq!(adapter.id(), "markdown");
/// assert!(adapter.supports_path(Path::new("readme.md")));
/// ```
pub trait DocFormatAdapter {
    /// Returns the adapter identifier (e.g., "markdown")
    fn id(&self) -> &str;

    /// Check if this adapter handles the given file, based on its extension
    fn supports_path(&self, path: &Path) -> bool;

    /// Rewrite the links of a whole document for the given XWiki space
    fn rewrite_links(&self, content: &str, space: &str) -> (String, RewriteStats);
}

/// Registry for managing document format adapters
///
/// # Example
///
/// ```
/// use md2xwiki::document::AdapterRegistry;
/// use std::path::Path;
///
/// let registry = AdapterRegistry::with_builtins();
/// let adapter = registry.resolve(Path::new("guide.md")).unwrap();
/// assert_eq!(adapter.id(), "markdown");
/// assert!(registry.resolve(Path::new("logo.png")).is_none());
/// ```
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn DocFormatAdapter + Send + Sync>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Create a registry with built-in adapters registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MarkdownAdapter::default()));
        registry
    }

    /// Create a registry whose Markdown adapter recognizes the given extensions
    pub fn with_extensions<S: AsRef<str>>(extensions: &[S]) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MarkdownAdapter::with_extensions(extensions)));
        registry
    }

    /// Register a format adapter
    pub fn register(&mut self, adapter: Box<dyn DocFormatAdapter + Send + Sync>) {
        self.adapters.push(adapter);
    }

    /// Resolve the adapter for a file path, first match wins
    pub fn resolve(&self, path: &Path) -> Option<&(dyn DocFormatAdapter + Send + Sync)> {
        self.adapters
            .iter()
            .find(|adapter| adapter.supports_path(path))
            .map(|adapter| adapter.as_ref())
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Markdown format adapter
///
/// Matches files by extension, case-insensitively, and converts their inline
/// links with the XWiki link rewriter.
#[derive(Debug, Clone)]
pub struct MarkdownAdapter {
    extensions: Vec<String>,
}

impl MarkdownAdapter {
    /// Create an adapter for a custom extension list.
    ///
    /// Leading dots are ignored, so `".md"` and `"md"` are equivalent.
    /// An empty list falls back to [`DEFAULT_EXTENSIONS`].
    pub fn with_extensions<S: AsRef<str>>(extensions: &[S]) -> Self {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if extensions.is_empty() {
            Self::default()
        } else {
            Self { extensions }
        }
    }

    /// Extensions this adapter recognizes, lowercase and without dots
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for MarkdownAdapter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DocFormatAdapter for MarkdownAdapter {
    fn id(&self) -> &str {
        "markdown"
    }

    fn supports_path(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext_str = ext.to_string_lossy().to_lowercase();
                self.extensions.iter().any(|known| *known == ext_str)
            }
            None => false,
        }
    }

    fn rewrite_links(&self, content: &str, space: &str) -> (String, RewriteStats) {
        rewrite_with_stats(content, space)
    }
}
