use crate::config::Config;
use crate::error::{Result, SrcDumpError};
use crate::scanner::file_filter::FileFilter;
use crate::ui::output::format_bytes;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub size: u64,
}

impl SourceFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        Self {
            source_path,
            relative_path,
            size,
        }
    }

    /// Relative path as written into banners, with the platform separator.
    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }

    pub fn extension(&self) -> String {
        self.relative_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Files in output order.
    pub files: Vec<SourceFile>,
    /// Walk problems that did not stop the scan.
    pub warnings: Vec<String>,
}

pub struct SourceScanner {
    filter: FileFilter,
    sort_directories: bool,
}

impl SourceScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            filter: FileFilter::new(config),
            sort_directories: config.traversal.sort_directories,
        }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanOutcome> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(SrcDumpError::InvalidInput {
                path: root_path.display().to_string(),
            });
        }

        let mut outcome = ScanOutcome::default();
        let sort_directories = self.sort_directories;

        // Files sort ahead of subdirectories so a directory's own files are
        // emitted before anything below it.
        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by(move |a, b| walk_order(a, b, sort_directories))
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        outcome.warnings.push(format!("Permission denied: {}", err));
                    } else {
                        outcome.warnings.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            match self.process_file(&entry, root_path) {
                Ok(Some(source_file)) => outcome.files.push(source_file),
                Ok(None) => {}
                Err(err) => outcome.warnings.push(format!(
                    "Error processing {}: {}",
                    entry.path().display(),
                    err
                )),
            }
        }

        Ok(outcome)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        // The root is never pruned, whatever its name.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let dir_name = entry.file_name().to_string_lossy();
        self.filter.should_traverse_directory(&dir_name)
    }

    fn process_file(&self, entry: &DirEntry, root_path: &Path) -> Result<Option<SourceFile>> {
        let path = entry.path();

        let file_name = entry.file_name().to_string_lossy();
        if !self.filter.is_source_file(&file_name) {
            return Ok(None);
        }

        // Links to directories are never descended nor collected.
        if entry.path_is_symlink() && path.is_dir() {
            return Ok(None);
        }

        let relative_path = path
            .strip_prefix(root_path)
            .map_err(|_| SrcDumpError::InvalidInput {
                path: format!(
                    "Cannot calculate relative path for {} from root {}",
                    path.display(),
                    root_path.display()
                ),
            })?
            .to_path_buf();

        // Size is informational; unreadable entries still get a block.
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(Some(SourceFile::new(path.to_path_buf(), relative_path, size)))
    }

    pub fn get_statistics(&self, files: &[SourceFile]) -> ScanStatistics {
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

        let (largest_file_size, largest_file_path) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.relative_path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            files_by_extension,
            largest_file_size,
            largest_file_path,
        }
    }
}

fn walk_order(a: &DirEntry, b: &DirEntry, sort_directories: bool) -> Ordering {
    match (a.file_type().is_dir(), b.file_type().is_dir()) {
        (false, false) => a.file_name().cmp(b.file_name()),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) if sort_directories => a.file_name().cmp(b.file_name()),
        // Stable sort keeps the walk's own directory order.
        (true, true) => Ordering::Equal,
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: HashMap<String, usize>,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn relative_paths(outcome: &ScanOutcome) -> Vec<PathBuf> {
        outcome.files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use crate::collector::{BlockOutcome, SnapshotWriter};
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "x.cs", "class X {}");
        write(root, "sub/y.cs", "class Y {}");
        symlink(root.join("x.cs"), root.join("l.cs")).unwrap();
        symlink(root.join("missing.cs"), root.join("dangling.cs")).unwrap();
        symlink(root.join("sub"), root.join("linkdir")).unwrap();
        symlink(root.join("sub"), root.join("linkdir.cs")).unwrap();

        let scanner = SourceScanner::new(&Config::default());
        let outcome = scanner.scan_directory(root).unwrap();

        // Directory links are neither descended nor collected.
        assert_eq!(
            relative_paths(&outcome),
            vec![
                PathBuf::from("dangling.cs"),
                PathBuf::from("l.cs"),
                PathBuf::from("x.cs"),
                PathBuf::from("sub").join("y.cs"),
            ]
        );

        let mut writer = SnapshotWriter::new(Vec::new(), Path::new("out_1.txt"));
        let dangling = writer.write_file(&outcome.files[0]).unwrap();
        let linked = writer.write_file(&outcome.files[1]).unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(matches!(dangling, BlockOutcome::ReadFailed { .. }));
        assert_eq!(linked, BlockOutcome::Written { bytes: 10 });
        assert!(output.contains("File: dangling.cs ---"));
        assert!(output.contains("Error reading file: "));
        assert!(output.ends_with("class X {}"));
    }

    #[test]
    fn test_exclusions_and_case_insensitive_match() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.cs", "class A {}");
        write(root, "A.CS", "class B {}");
        write(root, "b.txt", "text");
        write(root, "bin/c.cs", "class C {}");
        write(root, ".hidden/d.cs", "class D {}");

        let scanner = SourceScanner::new(&Config::default());
        let outcome = scanner.scan_directory(root).unwrap();

        assert_eq!(
            relative_paths(&outcome),
            vec![PathBuf::from("A.CS"), PathBuf::from("a.cs")]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_pruning_reaches_all_descendants() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/Obj/deep/x.cs", "");
        write(root, "src/.vs/y.json", "");
        write(root, "src/keep/z.cs", "");

        let scanner = SourceScanner::new(&Config::default());
        let outcome = scanner.scan_directory(root).unwrap();

        assert_eq!(
            relative_paths(&outcome),
            vec![Path::new("src").join("keep").join("z.cs")]
        );
    }

    #[test]
    fn test_directory_files_precede_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "z.cs", "");
        write(root, "a/inner.cs", "");
        write(root, "m.json", "");

        let scanner = SourceScanner::new(&Config::default());
        let outcome = scanner.scan_directory(root).unwrap();

        assert_eq!(
            relative_paths(&outcome),
            vec![
                PathBuf::from("m.json"),
                PathBuf::from("z.cs"),
                Path::new("a").join("inner.cs"),
            ]
        );
    }

    #[test]
    fn test_sorted_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for dir in ["delta", "alpha", "charlie", "bravo"] {
            write(root, &format!("{}/f.cs", dir), "");
        }

        let mut config = Config::default();
        config.traversal.sort_directories = true;
        let outcome = SourceScanner::new(&config).scan_directory(root).unwrap();

        assert_eq!(
            relative_paths(&outcome),
            ["alpha", "bravo", "charlie", "delta"]
                .iter()
                .map(|d| Path::new(d).join("f.cs"))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_root_is_never_pruned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("bin");
        write(&root, "Program.cs", "");

        let outcome = SourceScanner::new(&Config::default())
            .scan_directory(&root)
            .unwrap();

        assert_eq!(relative_paths(&outcome), vec![PathBuf::from("Program.cs")]);
    }

    #[test]
    fn test_hidden_files_are_collected() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), ".editorconfig.json", "{}");

        let outcome = SourceScanner::new(&Config::default())
            .scan_directory(temp_dir.path())
            .unwrap();

        assert_eq!(outcome.files.len(), 1);
    }

    #[test]
    fn test_non_directory_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "file.cs", "");

        let result = SourceScanner::new(&Config::default())
            .scan_directory(temp_dir.path().join("file.cs"));
        assert!(matches!(result, Err(SrcDumpError::InvalidInput { .. })));
    }

    #[test]
    fn test_scan_statistics() {
        let files = vec![
            SourceFile::new(PathBuf::from("a.cs"), PathBuf::from("a.cs"), 100),
            SourceFile::new(PathBuf::from("b.CS"), PathBuf::from("b.CS"), 300),
            SourceFile::new(PathBuf::from("c.json"), PathBuf::from("c.json"), 50),
        ];

        let scanner = SourceScanner::new(&Config::default());
        let stats = scanner.get_statistics(&files);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 450);
        assert_eq!(stats.files_by_extension.get("cs"), Some(&2));
        assert_eq!(stats.largest_file_path, PathBuf::from("b.CS"));
        assert!(stats.display_summary().contains("cs: 2 files"));
    }
}
