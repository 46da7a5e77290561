use crate::collector::{CollectionProgress, CollectionReport, ConfigSnapshot, SnapshotWriter};
use crate::config::Config;
use crate::error::{Result, SrcDumpError};
use crate::resolver::OutputPathResolver;
use crate::scanner::{ScanOutcome, SourceFile, SourceScanner};
use std::path::{Path, PathBuf};

/// Runs the resolve, scan and write steps against one configuration.
pub struct SourceCollector {
    scanner: SourceScanner,
    config_snapshot: ConfigSnapshot,
}

impl SourceCollector {
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: SourceScanner::new(config),
            config_snapshot: ConfigSnapshot::from(config),
        }
    }

    pub fn scanner(&self) -> &SourceScanner {
        &self.scanner
    }

    pub fn validate_input(&self, input_dir: &Path) -> Result<()> {
        if input_dir.is_dir() {
            Ok(())
        } else {
            Err(SrcDumpError::InvalidInput {
                path: input_dir.display().to_string(),
            })
        }
    }

    pub fn resolve_output(&self, base_output: &Path) -> Result<PathBuf> {
        OutputPathResolver::new(base_output)?.resolve()
    }

    pub fn preview_output(&self, base_output: &Path) -> Result<PathBuf> {
        OutputPathResolver::new(base_output)?.preview()
    }

    pub fn scan(&self, input_dir: &Path) -> Result<ScanOutcome> {
        self.scanner.scan_directory(input_dir)
    }

    /// Writes every file into a freshly created snapshot at `output_path`.
    pub fn write_snapshot(
        &self,
        files: &[SourceFile],
        output_path: &Path,
        progress_callback: Option<&dyn Fn(&CollectionProgress)>,
    ) -> Result<CollectionProgress> {
        let mut writer = SnapshotWriter::create(output_path)?;
        let progress = writer.write_files(files, progress_callback)?;
        writer.finish()?;
        Ok(progress)
    }

    pub fn build_report(
        &self,
        input_dir: &Path,
        output_path: &Path,
        outcome: ScanOutcome,
        progress: &CollectionProgress,
    ) -> CollectionReport {
        CollectionReport::new(
            input_dir,
            output_path,
            &outcome.files,
            progress,
            outcome.warnings,
            self.config_snapshot.clone(),
        )
    }

    /// Full run without any console output.
    pub fn collect(&self, input_dir: &Path, base_output: &Path) -> Result<CollectionReport> {
        self.validate_input(input_dir)?;

        let output_path = self.resolve_output(base_output)?;
        // Scanning before the output file exists keeps it out of its own snapshot.
        let outcome = self.scan(input_dir)?;
        let progress = self.write_snapshot(&outcome.files, &output_path, None)?;

        Ok(self.build_report(input_dir, &output_path, outcome, &progress))
    }
}
