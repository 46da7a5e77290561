use crate::collector::CollectionProgress;
use crate::config::Config;
use crate::error::{Result, SrcDumpError};
use crate::scanner::SourceFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub summary: CollectionSummary,
    pub files: Vec<FileInfo>,
    pub collected_at: DateTime<Utc>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub files_written: usize,
    pub files_failed: usize,
    pub bytes_written: u64,
    pub duration: Duration,
    pub files_by_extension: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub relative_path: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub skip_hidden_dirs: bool,
    pub sort_directories: bool,
}

impl From<&SourceFile> for FileInfo {
    fn from(file: &SourceFile) -> Self {
        Self {
            relative_path: file.display_path(),
            size: file.size,
        }
    }
}

impl From<&Config> for ConfigSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            extensions: config.filters.extensions.clone(),
            exclude_dirs: config.filters.exclude_dirs.clone(),
            skip_hidden_dirs: config.traversal.skip_hidden_dirs,
            sort_directories: config.traversal.sort_directories,
        }
    }
}

impl CollectionReport {
    pub fn new(
        input_dir: &Path,
        output_path: &Path,
        files: &[SourceFile],
        progress: &CollectionProgress,
        warnings: Vec<String>,
        config: ConfigSnapshot,
    ) -> Self {
        let mut files_by_extension = HashMap::new();
        for file in files {
            let ext = file.extension();
            let ext = if ext.is_empty() {
                "no_extension".to_string()
            } else {
                ext
            };
            *files_by_extension.entry(ext).or_insert(0) += 1;
        }

        let summary = CollectionSummary {
            files_written: progress.files_written,
            files_failed: progress.errors.len(),
            bytes_written: progress.bytes_written,
            duration: progress.elapsed(),
            files_by_extension,
        };

        Self {
            input_dir: input_dir.to_path_buf(),
            output_path: output_path.to_path_buf(),
            summary,
            files: files.iter().map(FileInfo::from).collect(),
            collected_at: Utc::now(),
            errors: progress.errors.clone(),
            warnings,
            config_used: config,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SrcDumpError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_files() -> Vec<SourceFile> {
        vec![
            SourceFile::new(PathBuf::from("/p/a.cs"), PathBuf::from("a.cs"), 10),
            SourceFile::new(PathBuf::from("/p/b.CS"), PathBuf::from("b.CS"), 20),
            SourceFile::new(PathBuf::from("/p/app.json"), PathBuf::from("app.json"), 5),
        ]
    }

    #[test]
    fn test_report_summary() {
        let files = sample_files();
        let mut progress = CollectionProgress::new(files.len(), 35);
        progress.update_file("a.cs".to_string(), 10);
        progress.update_file("b.CS".to_string(), 0);
        progress.add_error("Failed to read b.CS: stream did not contain valid UTF-8");
        progress.update_file("app.json".to_string(), 5);

        let report = CollectionReport::new(
            Path::new("/p"),
            Path::new("out_1.txt"),
            &files,
            &progress,
            Vec::new(),
            ConfigSnapshot::from(&Config::default()),
        );

        assert_eq!(report.summary.files_written, 3);
        assert_eq!(report.summary.files_failed, 1);
        assert_eq!(report.summary.bytes_written, 15);
        assert_eq!(report.summary.files_by_extension.get("cs"), Some(&2));
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_report_json() {
        let files = sample_files();
        let progress = CollectionProgress::new(files.len(), 35);
        let report = CollectionReport::new(
            Path::new("/p"),
            Path::new("dumps/out_2.txt"),
            &files,
            &progress,
            vec!["Permission denied: /p/secret".to_string()],
            ConfigSnapshot::from(&Config::default()),
        );

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["output_path"], "dumps/out_2.txt");
        assert_eq!(value["config_used"]["exclude_dirs"][0], "bin");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }
}
