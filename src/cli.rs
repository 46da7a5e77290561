use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

pub const USAGE: &str = "Usage: srcdump <input_folder> <output_file>\n\
    Example: srcdump C:\\Projects\\MyWpfApp C:\\Dumps\\output.txt\n\
    Example: srcdump ~/projects/my-app ~/dumps/output.txt";

#[derive(Parser, Debug)]
#[command(name = "srcdump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concatenate a project's source files into a single numbered snapshot")]
#[command(
    long_about = "srcdump walks a directory tree, picks the source files whose names end with \
                  one of the configured extensions, and writes them into one text file with a \
                  banner naming each file. Every run writes a new file: output.txt becomes \
                  output_1.txt, then output_2.txt, and so on."
)]
#[command(after_help = "EXAMPLES:\n  \
    srcdump ./MyWpfApp dumps/output.txt\n  \
    srcdump ./service snapshot.txt --extensions rs,toml --exclude target\n  \
    srcdump ./service snapshot.txt --dry-run\n  \
    srcdump --generate-config")]
pub struct Cli {
    /// Directory to collect source files from
    pub input_dir: Option<PathBuf>,

    /// Base output file; the written file gets a numbered suffix
    pub output_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Extensions to collect (comma-separated)
    #[arg(
        short,
        long,
        help = "File extensions to collect, replacing the configured list (e.g. cs,xaml,json)"
    )]
    pub extensions: Option<String>,

    /// Additional directory names to skip
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Visit sibling directories in name order
    #[arg(long, help = "Visit sibling directories in name order for fully deterministic output")]
    pub sort_dirs: bool,

    /// Output format for the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only the final confirmation line)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be collected without writing anything)
    #[arg(long, help = "List the files and output path without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    /// Both positional paths, or `None` when either is missing.
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        match (&self.input_dir, &self.output_file) {
            (Some(input), Some(output)) => Some((input.as_path(), output.as_path())),
            _ => None,
        }
    }

    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extensions(self.extensions.clone())
            .with_exclude(self.exclude.clone())
            .with_sort_directories(self.sort_dirs)
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn print_usage() {
    println!("{}", USAGE);
}

/// Handles a failed parse and returns the exit code.
///
/// Missing or surplus arguments are usage errors: they print the usage text to
/// stdout and exit successfully. Malformed option values keep clap's own report.
pub fn handle_parse_error(err: clap::Error) -> i32 {
    if is_usage_error(err.kind()) {
        print_usage();
        return 0;
    }

    let _ = err.print();
    err.exit_code()
}

pub fn is_usage_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnknownArgument
            | ErrorKind::MissingRequiredArgument
            | ErrorKind::TooManyValues
            | ErrorKind::WrongNumberOfValues
    )
}
