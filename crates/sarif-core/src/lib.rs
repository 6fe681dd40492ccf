pub mod config;
pub mod enumeration;
pub mod errors;
pub mod model;
pub mod transform;
pub mod version;

pub use transform::{parse_document, transform_document, transform_file, transform_text, SarifDocument};
pub use version::SarifVersion;
