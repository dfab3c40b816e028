pub mod loader;

pub use loader::{LoadError, Source, fetch_text, load_geometry, load_records, parse_records};
