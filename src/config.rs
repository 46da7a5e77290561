use crate::error::{Result, SrcDumpError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub traversal: TraversalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// File name suffixes to collect, leading dot included.
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk (case-insensitive).
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub skip_hidden_dirs: bool,
    /// Visit sibling directories in name order instead of walk order.
    pub sort_directories: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                ".cs".to_string(),
                ".xaml".to_string(),
                ".csproj".to_string(),
                ".sln".to_string(),
                ".json".to_string(),
            ],
            exclude_dirs: vec!["bin".to_string(), "obj".to_string()],
        }
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            skip_hidden_dirs: true,
            sort_directories: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SrcDumpError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SrcDumpError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SrcDumpError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["srcdump.toml", ".srcdump.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extensions) = cli_args.extensions {
            self.filters.extensions = extensions
                .split(',')
                .map(normalize_extension)
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(ref exclude) = cli_args.exclude {
            for dir in exclude {
                let dir = dir.trim();
                if !dir.is_empty() && !self.filters.exclude_dirs.iter().any(|d| d == dir) {
                    self.filters.exclude_dirs.push(dir.to_string());
                }
            }
        }

        if cli_args.sort_directories {
            self.traversal.sort_directories = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| SrcDumpError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| SrcDumpError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.extensions.is_empty() {
            return Err(SrcDumpError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if let Some(ext) = self.filters.extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(SrcDumpError::Config {
                message: format!("Extension '{}' must start with a dot, e.g. '.cs'", ext),
            });
        }

        if self.filters.exclude_dirs.iter().any(|d| d.contains('/') || d.contains('\\')) {
            return Err(SrcDumpError::Config {
                message: "Excluded directories are matched by name and cannot contain path separators"
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

fn normalize_extension(raw: &str) -> String {
    let ext = raw.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extensions: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub sort_directories: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(mut self, extensions: Option<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_sort_directories(mut self, sort: bool) -> Self {
        self.sort_directories = sort;
        self
    }
}
