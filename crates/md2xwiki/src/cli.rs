//! Command-line interface definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::output::ExitCode;

/// Convert Markdown relative links to XWiki syntax
///
/// Reads every Markdown file directly inside the input directory, rewrites its
/// relative links into XWiki links under the given space, and writes the
/// result to the output directory under the same file name.
///
///   [text](file.md)          -> [[text>>doc:Space.file]]
///   [text](file.md#section)  -> [[text>>doc:Space.file||anchor="section"]]
///   [text](#section)         -> [[text>>doc:||anchor="section"]]
///   [text](https://...)      -> unchanged
///
/// Settings may also come from md2xwiki.toml ([conversion] space, input,
/// output, extensions); flags take priority.
#[derive(Parser, Debug)]
#[command(name = "md2xwiki", version, verbatim_doc_comment)]
#[command(about = "Convert Markdown relative links to XWiki syntax")]
#[command(after_long_help = ExitCode::all_codes_documentation())]
pub struct Cli {
    /// XWiki space name (e.g., 'Handbook')
    #[arg(short, long)]
    pub space: Option<String>,

    /// Input directory containing .md files [default: docs]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for converted files [default: output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file to read instead of ./md2xwiki.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Suppress per-file progress and notices (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a machine-readable JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Settings given on the command line, for merging with the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            space: self.space.clone(),
            input: self.input.clone(),
            output: self.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_help_lists_exit_codes() {
        let help = Cli::command().render_long_help().to_string();

        assert!(help.contains("Exit Codes:"));
        assert!(help.contains(" 3  - Input directory not found"));
        assert!(help.contains("10  - File system error"));
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "md2xwiki", "--space", "MySpace", "--input", "in", "--output", "out", "--quiet",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.space.as_deref(), Some("MySpace"));
        assert_eq!(cli.input, Some(PathBuf::from("in")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.quiet);
        assert!(cli.json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let cli = Cli::try_parse_from(["md2xwiki", "-s", "S"]).unwrap();
        let overrides = cli.overrides();

        assert_eq!(overrides.space.as_deref(), Some("S"));
        assert!(overrides.input.is_none());
        assert!(overrides.output.is_none());
    }
}
