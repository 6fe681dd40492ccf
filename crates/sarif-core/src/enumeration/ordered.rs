use std::any::Any;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use super::artifact::EnumeratedArtifact;
use super::cancel::CancellationToken;
use super::file_system::{FileFilter, FileSystem, LocalFileSystem};
use super::specifier;
use super::ArtifactProvider;
use crate::errors::EnumerationError;

/// Paths buffered between the directory walker and the consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationState {
    Created,
    Enumerating,
    Completed,
    Faulted,
    Cancelled,
}

#[derive(Debug, Default)]
struct SideChannels {
    skipped: Vec<EnumeratedArtifact>,
    errors: Vec<EnumerationError>,
}

fn lock(side: &Mutex<SideChannels>) -> MutexGuard<'_, SideChannels> {
    side.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Enumerates the files named by one specifier.
///
/// Files are sorted ordinally within each directory. With `recurse`, a
/// background walker pushes paths into a bounded queue while the caller
/// drains it, so there is no global order across directories. Symbolic-link
/// directories are never descended into. A subdirectory that cannot be
/// listed is reported through [`take_errors`](Self::take_errors) and skipped.
pub struct OrderedFileSpecifier {
    specifier: String,
    recurse: bool,
    max_file_size_kb: Option<u64>,
    channel_capacity: usize,
    cancellation: CancellationToken,
    file_system: Arc<dyn FileSystem>,
    current_dir: Option<PathBuf>,
    side: Arc<Mutex<SideChannels>>,
}

impl OrderedFileSpecifier {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            recurse: false,
            max_file_size_kb: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cancellation: CancellationToken::new(),
            file_system: Arc::new(LocalFileSystem),
            current_dir: None,
            side: Arc::default(),
        }
    }

    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Files larger than this are diverted to [`skipped`](Self::skipped).
    pub fn max_file_size_kb(mut self, max: Option<u64>) -> Self {
        self.max_file_size_kb = max;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    /// Base for relative specifiers; defaults to the process working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    /// Starts nothing until the returned iterator is first polled.
    pub fn artifacts(&self) -> OrderedArtifacts {
        OrderedArtifacts {
            state: EnumerationState::Created,
            pending: Some(StartOptions {
                specifier: self.specifier.clone(),
                recurse: self.recurse,
                max_file_size: self.max_file_size_kb.map(|kb| kb.saturating_mul(1024)),
                channel_capacity: self.channel_capacity,
                current_dir: self.current_dir.clone(),
                side: Arc::clone(&self.side),
            }),
            receiver: None,
            worker: None,
            ended: Arc::new(AtomicBool::new(false)),
            cancellation: self.cancellation.clone(),
            file_system: Arc::clone(&self.file_system),
        }
    }

    /// Oversized files seen by the most recent pass.
    pub fn skipped(&self) -> Vec<EnumeratedArtifact> {
        lock(&self.side).skipped.clone()
    }

    /// Drains the errors reported for directories that were skipped.
    pub fn take_errors(&self) -> Vec<EnumerationError> {
        std::mem::take(&mut lock(&self.side).errors)
    }
}

impl ArtifactProvider for OrderedFileSpecifier {
    fn artifacts(&self) -> Box<dyn Iterator<Item = Result<EnumeratedArtifact, EnumerationError>> + '_> {
        Box::new(OrderedFileSpecifier::artifacts(self))
    }

    fn skipped(&self) -> Vec<EnumeratedArtifact> {
        OrderedFileSpecifier::skipped(self)
    }

    fn take_errors(&self) -> Vec<EnumerationError> {
        OrderedFileSpecifier::take_errors(self)
    }
}

struct StartOptions {
    specifier: String,
    recurse: bool,
    max_file_size: Option<u64>,
    channel_capacity: usize,
    current_dir: Option<PathBuf>,
    side: Arc<Mutex<SideChannels>>,
}

/// Pull side of one enumeration.
///
/// Dropping the iterator before it is exhausted stops the walker and waits
/// for it to exit. A walker failure is yielded as the final item only when
/// the consumer drained the queue; after cancellation or an early drop it is
/// logged and discarded.
pub struct OrderedArtifacts {
    state: EnumerationState,
    pending: Option<StartOptions>,
    receiver: Option<mpsc::Receiver<PathBuf>>,
    worker: Option<JoinHandle<Result<(), EnumerationError>>>,
    ended: Arc<AtomicBool>,
    cancellation: CancellationToken,
    file_system: Arc<dyn FileSystem>,
}

impl OrderedArtifacts {
    pub fn state(&self) -> EnumerationState {
        self.state
    }

    fn start(&mut self, options: StartOptions) -> Result<(), EnumerationError> {
        {
            let mut side = lock(&options.side);
            side.skipped.clear();
            side.errors.clear();
        }
        let cwd = match options.current_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|error| EnumerationError::Io {
                error,
                path: PathBuf::from("."),
            })?,
        };
        let resolved = specifier::resolve(&options.specifier, self.file_system.as_ref(), &cwd);
        let filter = FileFilter::new(&resolved.filter)?;

        if !self.file_system.directory_exists(&resolved.directory) {
            tracing::debug!(
                event = "sarif.enumeration.root_missing",
                directory = %resolved.directory.display(),
                "enumeration root does not exist"
            );
            self.state = EnumerationState::Completed;
            return Ok(());
        }

        tracing::debug!(
            event = "sarif.enumeration.started",
            directory = %resolved.directory.display(),
            filter = filter.pattern(),
            recurse = options.recurse,
            "enumerating files"
        );

        let (sender, receiver) = mpsc::channel(options.channel_capacity);
        let walker = Walker {
            file_system: Arc::clone(&self.file_system),
            filter,
            max_file_size: options.max_file_size,
            sender,
            ended: Arc::clone(&self.ended),
            cancellation: self.cancellation.clone(),
            side: options.side,
        };
        let root = resolved.directory;
        let recurse = options.recurse;
        let worker = std::thread::Builder::new()
            .name("sarif-enumerate".to_string())
            .spawn(move || walker.run(&root, recurse))
            .map_err(EnumerationError::WorkerSpawn)?;

        self.receiver = Some(receiver);
        self.worker = Some(worker);
        self.state = EnumerationState::Enumerating;
        Ok(())
    }

    fn join_worker(&mut self) -> Result<(), EnumerationError> {
        match self.worker.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|payload| Err(EnumerationError::WorkerPanicked(panic_message(payload)))),
            None => Ok(()),
        }
    }

    /// Early termination: flag the walker, unblock it, wait for it to exit.
    fn stop(&mut self, state: EnumerationState) {
        self.ended.store(true, Ordering::SeqCst);
        self.receiver = None;
        if let Err(error) = self.join_worker() {
            tracing::debug!(
                event = "sarif.enumeration.worker_fault_suppressed",
                error = %error,
                "walker failure discarded after early termination"
            );
        }
        self.state = state;
    }

    /// The walker closed the queue.
    fn finish(&mut self) -> Option<Result<EnumeratedArtifact, EnumerationError>> {
        self.receiver = None;
        let outcome = self.join_worker();
        if self.cancellation.is_cancelled() {
            if let Err(error) = outcome {
                tracing::debug!(
                    event = "sarif.enumeration.worker_fault_suppressed",
                    error = %error,
                    "walker failure discarded after cancellation"
                );
            }
            self.state = EnumerationState::Cancelled;
            return None;
        }

        match outcome {
            Ok(()) => {
                self.state = EnumerationState::Completed;
                None
            }
            Err(error) => {
                self.state = EnumerationState::Faulted;
                Some(Err(error))
            }
        }
    }
}

impl Iterator for OrderedArtifacts {
    type Item = Result<EnumeratedArtifact, EnumerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == EnumerationState::Created {
            if let Some(options) = self.pending.take() {
                if let Err(error) = self.start(options) {
                    self.state = EnumerationState::Faulted;
                    return Some(Err(error));
                }
            }
        }
        if self.state != EnumerationState::Enumerating {
            return None;
        }

        if self.cancellation.is_cancelled() || self.ended.load(Ordering::SeqCst) {
            self.stop(EnumerationState::Cancelled);
            return None;
        }

        let received = match self.receiver.as_mut() {
            Some(receiver) => receiver.blocking_recv(),
            None => None,
        };
        let Some(path) = received else {
            return self.finish();
        };

        if self.cancellation.is_cancelled() {
            self.stop(EnumerationState::Cancelled);
            return None;
        }
        Some(EnumeratedArtifact::new(path, Arc::clone(&self.file_system)))
    }
}

impl Drop for OrderedArtifacts {
    fn drop(&mut self) {
        if self.state == EnumerationState::Enumerating {
            self.stop(EnumerationState::Cancelled);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Producer half, run on the background thread.
struct Walker {
    file_system: Arc<dyn FileSystem>,
    filter: FileFilter,
    max_file_size: Option<u64>,
    sender: mpsc::Sender<PathBuf>,
    ended: Arc<AtomicBool>,
    cancellation: CancellationToken,
    side: Arc<Mutex<SideChannels>>,
}

impl Walker {
    fn should_stop(&self) -> bool {
        self.cancellation.is_cancelled() || self.ended.load(Ordering::SeqCst)
    }

    /// A failure to list the root itself is the walker's fault; failures
    /// below it are reported and skipped.
    fn run(self, root: &Path, recurse: bool) -> Result<(), EnumerationError> {
        self.write_files(root).map_err(|error| EnumerationError::Io {
            error,
            path: root.to_path_buf(),
        })?;
        if recurse {
            self.walk_children(root);
        }
        Ok(())
    }

    fn walk_children(&self, directory: &Path) {
        if self.should_stop() {
            return;
        }

        let children: BTreeSet<PathBuf> = match self.file_system.enumerate_directories(directory) {
            Ok(children) => children.into_iter().collect(),
            Err(error) => {
                self.report_skipped_directory(directory, error);
                return;
            }
        };

        for child in children {
            if self.should_stop() {
                return;
            }
            if self.file_system.is_symbolic_link(&child) {
                continue;
            }
            match self.write_files(&child) {
                Ok(()) => self.walk_children(&child),
                Err(error) => self.report_skipped_directory(&child, error),
            }
        }
    }

    /// Sends the matching files of `directory` in ordinal order.
    fn write_files(&self, directory: &Path) -> std::io::Result<()> {
        let files: BTreeSet<PathBuf> = self
            .file_system
            .enumerate_files(directory, &self.filter)?
            .into_iter()
            .collect();

        for file in files {
            if self.should_stop() {
                return Ok(());
            }
            if self.is_oversized(&file) {
                continue;
            }
            if self.sender.blocking_send(file).is_err() {
                // Receiver is gone; the consumer stopped early.
                self.ended.store(true, Ordering::SeqCst);
                return Ok(());
            }
        }
        Ok(())
    }

    fn is_oversized(&self, file: &Path) -> bool {
        let Some(max) = self.max_file_size else {
            return false;
        };
        let Ok(size) = self.file_system.file_length(file) else {
            return false;
        };
        if size <= max {
            return false;
        }

        tracing::debug!(
            event = "sarif.enumeration.file_skipped",
            path = %file.display(),
            size_bytes = size,
            max_bytes = max,
            "file exceeds size limit"
        );
        if let Ok(artifact) = EnumeratedArtifact::new(file.to_path_buf(), Arc::clone(&self.file_system)) {
            lock(&self.side).skipped.push(artifact);
        }
        true
    }

    fn report_skipped_directory(&self, directory: &Path, error: std::io::Error) {
        tracing::warn!(
            event = "sarif.enumeration.directory_skipped",
            path = %directory.display(),
            error = %error,
            "skipping directory that could not be listed"
        );
        lock(&self.side).errors.push(EnumerationError::Io {
            error,
            path: directory.to_path_buf(),
        });
    }
}
