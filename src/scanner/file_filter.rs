use crate::config::Config;

/// Name-based rules deciding which files are collected and which directories are walked.
pub struct FileFilter {
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    skip_hidden_dirs: bool,
}

impl FileFilter {
    pub fn new(config: &Config) -> Self {
        Self {
            extensions: config
                .filters
                .extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            exclude_dirs: config
                .filters
                .exclude_dirs
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            skip_hidden_dirs: config.traversal.skip_hidden_dirs,
        }
    }

    pub fn is_source_file(&self, file_name: &str) -> bool {
        let name_lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| name_lower.ends_with(ext.as_str()))
    }

    pub fn should_traverse_directory(&self, dir_name: &str) -> bool {
        if self.skip_hidden_dirs && dir_name.starts_with('.') {
            return false;
        }

        let dir_name_lower = dir_name.to_lowercase();
        !self.exclude_dirs.iter().any(|exclude| *exclude == dir_name_lower)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
