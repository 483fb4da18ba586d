//! CSV Export Adapter
//!
//! Serializes a scored `CollectionTable` to disk.

mod exporter;

pub use exporter::{
    table_header, write_table_to, write_trait_summary_to, CsvExporter, ExportError,
};
