use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrcDumpError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input folder '{path}' not found")]
    InvalidInput { path: String },

    #[error("Invalid output path: {path}")]
    InvalidOutputPath { path: String },

    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output file {path}: {source}")]
    OutputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SrcDumpError {
    fn user_message(&self) -> String {
        match self {
            SrcDumpError::InvalidInput { path } => {
                format!("Input folder '{}' not found", path)
            }
            SrcDumpError::InvalidOutputPath { path } => {
                format!("Output path has no file name: {}", path)
            }
            SrcDumpError::OutputDirectory { path, source } => {
                format!("Could not prepare output directory {}: {}", path, source)
            }
            SrcDumpError::OutputFile { path, source } => {
                format!("Could not write output file {}: {}", path, source)
            }
            SrcDumpError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SrcDumpError::InvalidInput { .. } => Some(
                "Pass an existing directory as the first argument.".to_string()
            ),
            SrcDumpError::InvalidOutputPath { .. } => Some(
                "The second argument must name a file, e.g. dumps/output.txt".to_string()
            ),
            SrcDumpError::OutputDirectory { .. } | SrcDumpError::OutputFile { .. } => Some(
                "Ensure you have write permission for the output location.".to_string()
            ),
            SrcDumpError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config for a sample.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SrcDumpError {
    fn from(error: toml::de::Error) -> Self {
        SrcDumpError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SrcDumpError>;
