//! Ordered, cancellable enumeration of the files named by path specifiers.

pub mod aggregate;
pub mod artifact;
pub mod cancel;
pub mod file_system;
pub mod specifier;

mod ordered;

pub use aggregate::AggregatingArtifactProvider;
pub use artifact::EnumeratedArtifact;
pub use cancel::CancellationToken;
pub use file_system::{FileFilter, FileSystem, LocalFileSystem};
pub use ordered::{EnumerationState, OrderedArtifacts, OrderedFileSpecifier, DEFAULT_CHANNEL_CAPACITY};

use crate::errors::EnumerationError;

/// A source of enumerated artifacts with a side channel for files that were
/// found but not yielded.
pub trait ArtifactProvider {
    fn artifacts(&self) -> Box<dyn Iterator<Item = Result<EnumeratedArtifact, EnumerationError>> + '_>;

    fn skipped(&self) -> Vec<EnumeratedArtifact>;

    /// Errors for directories that were skipped, drained on each call.
    fn take_errors(&self) -> Vec<EnumerationError>;
}
