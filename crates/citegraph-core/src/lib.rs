//! Citegraph Core - Common infrastructure for the bibliographic graph pipeline
//!
//! Logging, progress lines, JSON input loading, CSV table output and
//! content manifests shared by the build, load and CLI crates.

pub mod error;
pub mod hash;
pub mod input;
pub mod logging;
pub mod manifest;
pub mod progress;
pub mod table;

// Re-exports for convenience
pub use error::InputError;
pub use input::{read_json, read_json_array};
pub use logging::{IndicatifLogger, init_logging};
pub use manifest::{OutputManifest, TableEntry};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use table::{Quoting, TableWriter, clean_field};
