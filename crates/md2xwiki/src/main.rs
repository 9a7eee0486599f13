//! md2xwiki
//!
//! Converts a folder of Markdown documents for import into XWiki by
//! rewriting their relative links into XWiki link syntax.

use anyhow::{Context, Result};
use clap::Parser;
use md2xwiki::cli::Cli;
use md2xwiki::config::Md2XwikiConfig;
use md2xwiki::converter::{ConvertedFile, Converter};
use md2xwiki::output::{ErrorCode, ExitCode, JsonError, JsonOutput, OutputContext};
use md2xwiki::{ConvertError, RewriteStats};
use serde::Serialize;
use std::env;
use std::path::Path;

/// Command name recorded in JSON metadata
const COMMAND: &str = "convert";

/// JSON payload for a finished run
#[derive(Serialize)]
struct ConversionSummary<'a> {
    space: &'a str,
    input: &'a Path,
    output: &'a Path,
    count: usize,
    files: &'a [ConvertedFile],
    totals: RewriteStats,
}

/// Helper to determine exit code from an error
fn error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    if let Some(convert_error) = error.downcast_ref::<ConvertError>() {
        return convert_error.exit_code();
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ExitCode::NotFound,
            std::io::ErrorKind::PermissionDenied => ExitCode::PermissionDenied,
            _ => ExitCode::ExternalError,
        };
    }

    ExitCode::GenericError
}

/// Print an error as a JSON envelope (stdout) or an actionable message (stderr)
fn report_error(error: &anyhow::Error, output_ctx: &OutputContext) {
    let convert_error = error.downcast_ref::<ConvertError>();

    if output_ctx.is_json() {
        let json_error = match convert_error {
            Some(e) => e.to_json_error(COMMAND),
            None => JsonError::new(ErrorCode::INTERNAL_ERROR, format!("{:#}", error), COMMAND),
        };
        match json_error.to_json_string() {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("Error: {:#}", error),
        }
        return;
    }

    match convert_error {
        Some(e) => eprint!("{}", e.to_actionable()),
        None => {
            let _ = output_ctx.print_error(format!("{:#}", error));
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output_ctx = OutputContext::new(cli.quiet, cli.json);

    let exit_code = match run(&cli, &output_ctx) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            report_error(&e, &output_ctx);
            error_to_exit_code(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run(cli: &Cli, output_ctx: &OutputContext) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to determine current directory")?;

    let config = Md2XwikiConfig::discover(cli.config.as_deref(), &current_dir)?;
    let options = config.resolve(cli.overrides())?;
    let converter = Converter::new(options);

    let report = converter.run_with(|file| {
        output_ctx.print_info(format!(
            "Converted: {} -> {}",
            file.file_name(),
            file.destination.display()
        ))
    })?;

    let options = converter.options();

    if output_ctx.is_json() {
        let data = ConversionSummary {
            space: &options.space,
            input: &options.input_dir,
            output: &options.output_dir,
            count: report.count(),
            files: &report.files,
            totals: report.totals,
        };
        println!("{}", JsonOutput::success(data, COMMAND).to_json_string()?);
        return Ok(());
    }

    if report.is_empty() {
        let extensions = options
            .extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join("/");
        output_ctx.print_warning(format!(
            "No {} files found in {}",
            extensions,
            options.input_dir.display()
        ))?;
    }

    output_ctx.print_info("")?;
    output_ctx.print_data(format!("Converted {} file(s)", report.count()))?;

    Ok(())
}
