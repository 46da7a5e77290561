use crate::error::{Result, SrcDumpError};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A user-supplied output path split into the parts the numbering scheme needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath {
    /// Parent directory; empty means the current directory.
    pub directory: PathBuf,
    pub stem: String,
    /// Extension with its leading dot, or empty.
    pub extension: String,
}

impl BasePath {
    pub fn numbered(&self, suffix: u64) -> PathBuf {
        self.directory
            .join(format!("{}_{}{}", self.stem, suffix, self.extension))
    }

    fn listing_directory(&self) -> &Path {
        if self.directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.directory
        }
    }

    fn suffix_pattern(&self) -> Result<Regex> {
        let pattern = format!(
            "^{}_([0-9]+){}$",
            regex::escape(&self.stem),
            regex::escape(&self.extension)
        );

        Regex::new(&pattern).map_err(|e| SrcDumpError::InvalidOutputPath {
            path: format!("{} ({})", self.numbered(1).display(), e),
        })
    }
}

/// Splits on the raw text so a trailing separator yields an empty stem and
/// leading dots never start an extension (`..foo` has no extension).
pub fn split_base_path(base: &Path) -> Result<BasePath> {
    let invalid = || SrcDumpError::InvalidOutputPath {
        path: base.display().to_string(),
    };

    let raw = base.to_str().ok_or_else(invalid)?;
    if raw.is_empty() {
        return Err(invalid());
    }

    let (head, name) = match raw.rfind(std::path::is_separator) {
        Some(index) => (&raw[..=index], &raw[index + 1..]),
        None => ("", raw),
    };

    // Trailing separators are dropped unless the head is nothing but separators.
    let trimmed = head.trim_end_matches(std::path::is_separator);
    let directory = if trimmed.is_empty() { head } else { trimmed };

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => name.split_at(dot),
        _ => (name, ""),
    };

    Ok(BasePath {
        directory: PathBuf::from(directory),
        stem: stem.to_string(),
        extension: extension.to_string(),
    })
}

/// Picks the next free `stem_N.ext` sibling of a base output path.
pub struct OutputPathResolver {
    base: BasePath,
}

impl OutputPathResolver {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        Ok(Self {
            base: split_base_path(base_path.as_ref())?,
        })
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Creates the output directory when missing and returns the next numbered path.
    pub fn resolve(&self) -> Result<PathBuf> {
        let directory = &self.base.directory;
        if !directory.as_os_str().is_empty() && !directory.exists() {
            fs::create_dir_all(directory).map_err(|source| SrcDumpError::OutputDirectory {
                path: directory.display().to_string(),
                source,
            })?;
        }

        let suffix = self.next_suffix()?;
        Ok(self.base.numbered(suffix))
    }

    /// Same as [`resolve`](Self::resolve) but never touches the filesystem beyond reading.
    pub fn preview(&self) -> Result<PathBuf> {
        let listing = self.base.listing_directory();
        let suffix = if listing.is_dir() {
            self.next_suffix()?
        } else {
            1
        };
        Ok(self.base.numbered(suffix))
    }

    pub fn next_suffix(&self) -> Result<u64> {
        let highest = self.highest_suffix()?;
        highest
            .checked_add(1)
            .ok_or_else(|| SrcDumpError::InvalidOutputPath {
                path: format!("{} (numbered suffix exhausted)", self.base.numbered(highest).display()),
            })
    }

    pub fn highest_suffix(&self) -> Result<u64> {
        let pattern = self.base.suffix_pattern()?;
        let listing = self.base.listing_directory();

        let list_error = |source| SrcDumpError::OutputDirectory {
            path: listing.display().to_string(),
            source,
        };

        let mut highest = 0u64;
        for entry in fs::read_dir(listing).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            if let Some(captures) = pattern.captures(name) {
                // Suffixes beyond u64 are ignored rather than wrapped.
                if let Ok(number) = captures[1].parse::<u64>() {
                    highest = highest.max(number);
                }
            }
        }

        Ok(highest)
    }
}
