pub mod report;
pub mod snapshot_writer;
pub mod source_collector;

pub use report::{CollectionReport, CollectionSummary, ConfigSnapshot, FileInfo};
pub use snapshot_writer::{format_banner, BlockOutcome, CollectionProgress, SnapshotWriter};
pub use source_collector::SourceCollector;
