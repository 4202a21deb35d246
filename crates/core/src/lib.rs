pub mod config;
pub mod layout;
pub mod record;
pub mod store;

pub use config::Config;
pub use layout::OutputLayout;
pub use record::{doc_id, sanitize_name, size_mb, DocumentRecord, RecordPaths};
pub use store::{MetadataError, MetadataIndex, MetadataStore};
