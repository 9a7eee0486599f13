//! Directory conversion
//!
//! Enumerates the documents directly inside an input directory, rewrites
//! their links and writes each result under the same file name in the
//! output directory. The first I/O failure aborts the run.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::{AdapterRegistry, DocFormatAdapter, RewriteStats};
use crate::errors::ConvertError;

/// Fully resolved settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub space: String,
    pub extensions: Vec<String>,
}

/// One converted document
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub format: String,
    pub stats: RewriteStats,
}

impl ConvertedFile {
    /// File name shared by the source and the destination
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome of a conversion run, files in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    pub files: Vec<ConvertedFile>,
    pub totals: RewriteStats,
}

impl ConversionReport {
    /// Number of documents converted
    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn push(&mut self, file: ConvertedFile) {
        self.totals.merge(&file.stats);
        self.files.push(file);
    }
}

/// Converts a directory of documents into XWiki link syntax
pub struct Converter {
    options: ConversionOptions,
    registry: AdapterRegistry,
}

impl Converter {
    /// Create a converter whose registry recognizes `options.extensions`
    pub fn new(options: ConversionOptions) -> Self {
        let registry = AdapterRegistry::with_extensions(&options.extensions);
        Self { options, registry }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// List the documents directly inside the input directory, sorted by file name.
    ///
    /// Subdirectories are not descended into.
    pub fn find_documents(&self) -> Result<Vec<PathBuf>, ConvertError> {
        let input_dir = &self.options.input_dir;
        if !input_dir.is_dir() {
            return Err(ConvertError::InputNotFound {
                path: input_dir.clone(),
            });
        }

        let entries =
            fs::read_dir(input_dir).map_err(|e| ConvertError::io("list", input_dir, e))?;

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConvertError::io("list", input_dir, e))?;
            let path = entry.path();
            if path.is_file() && self.registry.resolve(&path).is_some() {
                documents.push(path);
            }
        }

        documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(documents)
    }

    /// Convert a single document from `source` into `destination`
    pub fn convert_file(
        &self,
        adapter: &dyn DocFormatAdapter,
        source: &Path,
        destination: &Path,
    ) -> Result<RewriteStats, ConvertError> {
        let content =
            fs::read_to_string(source).map_err(|e| ConvertError::io("read", source, e))?;

        let (converted, stats) = adapter.rewrite_links(&content, &self.options.space);

        fs::write(destination, converted)
            .map_err(|e| ConvertError::io("write", destination, e))?;

        Ok(stats)
    }

    /// Convert every document, without progress reporting
    pub fn run(&self) -> Result<ConversionReport, ConvertError> {
        self.run_with(|_| Ok(()))
    }

    /// Convert every document, calling `on_file` after each one is written.
    ///
    /// The output directory is created even when there is nothing to convert.
    /// An error from `on_file` stops the run.
    pub fn run_with<F>(&self, mut on_file: F) -> Result<ConversionReport, ConvertError>
    where
        F: FnMut(&ConvertedFile) -> io::Result<()>,
    {
        let documents = self.find_documents()?;

        let output_dir = &self.options.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| ConvertError::io("create", output_dir, e))?;

        let mut report = ConversionReport::default();
        for source in documents {
            let Some(adapter) = self.registry.resolve(&source) else {
                continue;
            };
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let destination = output_dir.join(file_name);

            let stats = self.convert_file(adapter, &source, &destination)?;
            let converted = ConvertedFile {
                source,
                destination,
                format: adapter.id().to_string(),
                stats,
            };
            on_file(&converted).map_err(|source| ConvertError::Progress { source })?;
            report.push(converted);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(input: &Path, output: &Path) -> ConversionOptions {
        ConversionOptions {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            space: "MySpace".to_string(),
            extensions: vec!["md".to_string()],
        }
    }

    #[test]
    fn test_converts_documents_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("b.md"), "[A](a.md)").unwrap();
        fs::write(input.join("a.md"), "[Top](#top)").unwrap();
        fs::write(input.join("notes.txt"), "[A](a.md)").unwrap();

        let converter = Converter::new(options(&input, &output));
        let mut seen = Vec::new();
        let report = converter
            .run_with(|file| {
                seen.push(file.file_name());
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec!["a.md", "b.md"]);
        assert_eq!(report.count(), 2);
        assert_eq!(report.totals.cross_file, 1);
        assert_eq!(report.totals.same_page, 1);
        assert_eq!(
            fs::read_to_string(output.join("b.md")).unwrap(),
            "[[A>>doc:MySpace.a]]"
        );
        assert_eq!(
            fs::read_to_string(output.join("a.md")).unwrap(),
            "[[Top>>doc:||anchor=\"top\"]]"
        );
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn test_progress_failure_stops_run() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.md"), "[B](b.md)").unwrap();
        fs::write(input.join("b.md"), "[A](a.md)").unwrap();

        let converter = Converter::new(options(&input, &output));
        let mut calls = 0;
        let err = converter
            .run_with(|_| {
                calls += 1;
                Err(io::Error::new(io::ErrorKind::Other, "stdout closed"))
            })
            .unwrap_err();

        assert!(matches!(err, ConvertError::Progress { .. }));
        assert_eq!(calls, 1);
        assert!(output.join("a.md").exists());
        assert!(!output.join("b.md").exists());
    }

    #[test]
    fn test_missing_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("missing");
        let output = temp_dir.path().join("out");

        let err = Converter::new(options(&input, &output)).run().unwrap_err();

        assert!(matches!(err, ConvertError::InputNotFound { .. }));
        assert!(!output.exists(), "nothing is created before the input is checked");
    }

    #[test]
    fn test_input_that_is_a_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs.md");
        fs::write(&input, "x").unwrap();

        let err = Converter::new(options(&input, temp_dir.path()))
            .find_documents()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
    }

    #[test]
    fn test_empty_input_creates_output_and_reports_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        let output = temp_dir.path().join("nested/out");
        fs::create_dir(&input).unwrap();

        let report = Converter::new(options(&input, &output)).run().unwrap();

        assert!(report.is_empty());
        assert_eq!(report.totals, RewriteStats::default());
        assert!(output.is_dir());
    }

    #[test]
    fn test_subdirectories_are_not_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        fs::create_dir_all(input.join("nested.md")).unwrap();
        fs::write(input.join("nested.md/inner.md"), "[A](a.md)").unwrap();
        fs::write(input.join("top.md"), "text").unwrap();

        let documents = Converter::new(options(&input, temp_dir.path()))
            .find_documents()
            .unwrap();
        assert_eq!(documents, vec![input.join("top.md")]);
    }

    #[test]
    fn test_invalid_utf8_fails_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("bad.md"), [0xffu8, 0xfe, 0x00]).unwrap();

        let err = Converter::new(options(&input, &output)).run().unwrap_err();
        match err {
            ConvertError::Io { action, path, .. } => {
                assert_eq!(action, "read");
                assert_eq!(path, input.join("bad.md"));
            }
            other => panic!("Expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_overwrites_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("docs");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&output).unwrap();
        fs::create_dir(&input).unwrap();
        fs::write(input.join("page.md"), "[Jump](#end)").unwrap();
        fs::write(output.join("page.md"), "stale").unwrap();

        Converter::new(options(&input, &output)).run().unwrap();

        assert_eq!(
            fs::read_to_string(output.join("page.md")).unwrap(),
            "[[Jump>>doc:||anchor=\"end\"]]"
        );
    }
}
