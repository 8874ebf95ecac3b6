//! Pipeline stages, one module per stage

pub mod aggregator_invoker;
pub mod classifier;
pub mod folder_discovery;
pub mod manifest_writer;
pub mod metric_frame;
pub mod output_relocator;
pub mod report_assembler;
pub mod report_writer;
pub mod result_loader;

pub use aggregator_invoker::{AggregatorInvoker, AggregatorOutcome};
pub use classifier::{classify, Classification, ColumnStats};
pub use folder_discovery::FolderDiscovery;
pub use result_loader::GroupResults;
