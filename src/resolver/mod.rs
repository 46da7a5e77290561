pub mod output_path;

pub use output_path::{split_base_path, BasePath, OutputPathResolver};
