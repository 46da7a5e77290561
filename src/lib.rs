pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod resolver;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, TraversalConfig};
pub use error::{Result, SrcDumpError, UserFriendlyError};

// Core functionality re-exports
pub use collector::{
    format_banner, CollectionProgress, CollectionReport, ConfigSnapshot, SnapshotWriter,
    SourceCollector,
};
pub use resolver::{split_base_path, BasePath, OutputPathResolver};
pub use scanner::{FileFilter, ScanOutcome, SourceFile, SourceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// What a run would do, computed without writing anything.
#[derive(Debug)]
pub struct CollectionPlan {
    pub output_path: PathBuf,
    pub files: Vec<SourceFile>,
    pub warnings: Vec<String>,
}

/// Main library interface: one configured collector plus its console output.
pub struct SrcDump {
    config: Config,
    collector: SourceCollector,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl SrcDump {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let collector = SourceCollector::new(&config);

        Self {
            config,
            collector,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Collects every matching file under `input_dir` into the next numbered
    /// sibling of `base_output`.
    pub fn collect(&self, input_dir: &Path, base_output: &Path) -> Result<CollectionReport> {
        self.collector.validate_input(input_dir)?;

        let output_path = self.collector.resolve_output(base_output)?;
        self.output_formatter
            .debug(&format!("Resolved output file: {}", output_path.display()));

        let outcome = self.scan_sources(input_dir)?;

        let progress = self.write_snapshot(&outcome.files, &output_path)?;

        Ok(self
            .collector
            .build_report(input_dir, &output_path, outcome, &progress))
    }

    /// Dry run: resolves the output name and lists the files without creating anything.
    pub fn plan(&self, input_dir: &Path, base_output: &Path) -> Result<CollectionPlan> {
        self.collector.validate_input(input_dir)?;

        let output_path = self.collector.preview_output(base_output)?;
        let outcome = self.scan_sources(input_dir)?;

        Ok(CollectionPlan {
            output_path,
            files: outcome.files,
            warnings: outcome.warnings,
        })
    }

    fn scan_sources(&self, input_dir: &Path) -> Result<ScanOutcome> {
        self.output_formatter.start_operation("Scanning for source files");

        let spinner = self.progress_manager.create_spinner("Scanning...");
        let outcome = self.collector.scan(input_dir);
        spinner.finish_and_clear();
        let outcome = outcome?;

        for warning in &outcome.warnings {
            self.progress_manager
                .suspend(|| self.output_formatter.warning(warning));
        }

        let stats = self.collector.scanner().get_statistics(&outcome.files);
        self.output_formatter.debug(&stats.display_summary());
        self.output_formatter
            .info(&format!("Found {} source files", outcome.files.len()));

        Ok(outcome)
    }

    fn write_snapshot(&self, files: &[SourceFile], output_path: &Path) -> Result<CollectionProgress> {
        self.output_formatter.start_operation("Writing snapshot");

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &CollectionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = self
            .collector
            .write_snapshot(files, output_path, Some(&progress_callback));

        let progress = match result {
            Ok(progress) => progress,
            Err(e) => {
                file_progress.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Wrote {} files", progress.files_written),
            progress.elapsed(),
        );
        self.progress_manager.clear();

        for error in &progress.errors {
            self.output_formatter.warning(error);
        }

        Ok(progress)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(SrcDumpError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn handle_error(&self, error: &SrcDumpError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Collects with the default configuration and no console output.
pub fn collect_source_files<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    base_output: Q,
) -> Result<PathBuf> {
    let collector = SourceCollector::new(&Config::default());
    let report = collector.collect(input_dir.as_ref(), base_output.as_ref())?;
    Ok(report.output_path)
}
