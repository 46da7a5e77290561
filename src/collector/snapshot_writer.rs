use crate::error::{Result, SrcDumpError};
use crate::scanner::SourceFile;
use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BANNER_DASHES: usize = 20;
/// Width of the banner line minus the path: two dash runs, " File: " and a space.
const RULE_BASE_WIDTH: usize = 48;

/// Separator and two banner lines that precede every file body.
pub fn format_banner(relative_path: &str) -> String {
    let dashes = "-".repeat(BANNER_DASHES);
    let rule = "-".repeat(RULE_BASE_WIDTH + relative_path.chars().count());
    format!("\n\n{dashes} File: {relative_path} {dashes}\n{rule}\n\n")
}

#[derive(Debug, Clone)]
pub struct CollectionProgress {
    pub files_written: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub total_bytes: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl CollectionProgress {
    pub fn new(total_files: usize, total_bytes: u64) -> Self {
        Self {
            files_written: 0,
            total_files,
            bytes_written: 0,
            total_bytes,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Written { bytes: u64 },
    ReadFailed { message: String },
}

/// Appends file blocks to the snapshot. Any failure to write is fatal.
pub struct SnapshotWriter<W: Write> {
    writer: W,
    output_path: PathBuf,
}

impl SnapshotWriter<BufWriter<fs::File>> {
    /// Creates (or truncates) the output file.
    pub fn create(output_path: &Path) -> Result<Self> {
        let file = fs::File::create(output_path).map_err(|source| SrcDumpError::OutputFile {
            path: output_path.display().to_string(),
            source,
        })?;

        Ok(Self::new(BufWriter::with_capacity(64 * 1024, file), output_path))
    }
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(writer: W, output_path: &Path) -> Self {
        Self {
            writer,
            output_path: output_path.to_path_buf(),
        }
    }

    pub fn write_file(&mut self, file: &SourceFile) -> Result<BlockOutcome> {
        self.write_str(&format_banner(&file.display_path()))?;

        match fs::read_to_string(&file.source_path) {
            Ok(content) => {
                let content = normalize_newlines(&content);
                self.write_str(&content)?;
                Ok(BlockOutcome::Written {
                    bytes: content.len() as u64,
                })
            }
            Err(e) => {
                let message = e.to_string();
                self.write_str(&format!("Error reading file: {}\n", message))?;
                Ok(BlockOutcome::ReadFailed { message })
            }
        }
    }

    pub fn write_files(
        &mut self,
        files: &[SourceFile],
        progress_callback: Option<&dyn Fn(&CollectionProgress)>,
    ) -> Result<CollectionProgress> {
        let total_bytes = files.iter().map(|f| f.size).sum();
        let mut progress = CollectionProgress::new(files.len(), total_bytes);

        for file in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            match self.write_file(file)? {
                BlockOutcome::Written { bytes } => {
                    progress.update_file(file.display_path(), bytes);
                }
                BlockOutcome::ReadFailed { message } => {
                    progress.add_error(format!(
                        "Failed to read {}: {}",
                        file.display_path(),
                        message
                    ));
                    progress.update_file(file.display_path(), 0);
                }
            }
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    /// Flushes buffered output and hands back the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|source| SrcDumpError::OutputFile {
            path: self.output_path.display().to_string(),
            source,
        })?;
        Ok(self.writer)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| SrcDumpError::OutputFile {
                path: self.output_path.display().to_string(),
                source,
            })
    }
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
