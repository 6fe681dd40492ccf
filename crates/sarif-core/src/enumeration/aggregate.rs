use std::sync::Arc;

use super::cancel::CancellationToken;
use super::file_system::FileSystem;
use super::{ArtifactProvider, EnumeratedArtifact, OrderedFileSpecifier};
use crate::errors::EnumerationError;

/// Chains several providers, enumerating each to completion in turn.
#[derive(Default)]
pub struct AggregatingArtifactProvider {
    providers: Vec<Box<dyn ArtifactProvider + Send + Sync>>,
}

impl AggregatingArtifactProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Box<dyn ArtifactProvider + Send + Sync>) {
        self.providers.push(provider);
    }

    /// One [`OrderedFileSpecifier`] per specifier, sharing the options.
    pub fn from_specifiers<I, S>(
        specifiers: I,
        recurse: bool,
        max_file_size_kb: Option<u64>,
        cancellation: CancellationToken,
        file_system: Arc<dyn FileSystem>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let providers = specifiers
            .into_iter()
            .map(|specifier| {
                Box::new(
                    OrderedFileSpecifier::new(specifier)
                        .recurse(recurse)
                        .max_file_size_kb(max_file_size_kb)
                        .cancellation(cancellation.clone())
                        .file_system(Arc::clone(&file_system)),
                ) as Box<dyn ArtifactProvider + Send + Sync>
            })
            .collect();
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ArtifactProvider for AggregatingArtifactProvider {
    fn artifacts(&self) -> Box<dyn Iterator<Item = Result<EnumeratedArtifact, EnumerationError>> + '_> {
        Box::new(self.providers.iter().flat_map(|p| p.artifacts()))
    }

    fn skipped(&self) -> Vec<EnumeratedArtifact> {
        self.providers.iter().flat_map(|p| p.skipped()).collect()
    }

    fn take_errors(&self) -> Vec<EnumerationError> {
        self.providers.iter().flat_map(|p| p.take_errors()).collect()
    }
}
