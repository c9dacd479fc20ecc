//! Write queue serializing snapshot writes on a background task

use crate::core::error::Error;
use crate::core::store::{validate_key, FileBackend, StorageBackend};
use crate::Result;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// Commands that can be sent to the writer task
#[derive(Debug)]
enum WriteCommand {
    Write {
        key: String,
        value: String,
    },
    Flush {
        respond_to: oneshot::Sender<Result<()>>,
    },
    Shutdown {
        respond_to: oneshot::Sender<Result<()>>,
    },
}

/// File storage whose writes are applied by one background task
///
/// Writes return as soon as they are queued and land on disk strictly in the
/// order they were submitted, so a slow write can never overwrite a newer
/// snapshot. Reads see the latest queued value until it has been attempted;
/// a value whose write failed is forgotten and reads fall back to disk.
/// Failed writes are reported by the next `flush` or `shutdown`.
#[derive(Debug, Clone)]
pub struct QueuedFileBackend {
    files: FileBackend,
    pending: Arc<Mutex<HashMap<String, String>>>,
    command_sender: mpsc::UnboundedSender<WriteCommand>,
}

impl QueuedFileBackend {
    /// Starts the writer task. Must be called from within a tokio runtime.
    pub fn spawn(base_path: impl Into<PathBuf>) -> Self {
        let files = FileBackend::new(base_path);
        let (command_sender, command_receiver) = mpsc::unbounded_channel();

        let pending = Arc::default();

        tokio::spawn(run_writer(files.clone(), Arc::clone(&pending), command_receiver));

        Self {
            files,
            pending,
            command_sender,
        }
    }

    /// Waits until every write queued so far has been attempted
    ///
    /// Returns the last write failure since the previous flush, if any.
    pub async fn flush(&self) -> Result<()> {
        let (sender, receiver) = oneshot::channel();
        self.command_sender
            .send(WriteCommand::Flush { respond_to: sender })
            .map_err(|_| Error::Storage("Writer task has stopped".into()))?;

        receiver
            .await
            .map_err(|_| Error::Storage("Writer task dropped flush request".into()))?
    }

    /// Applies every queued write, then stops the writer task
    ///
    /// Returns the last write failure since the previous flush, if any.
    pub async fn shutdown(self) -> Result<()> {
        let (sender, receiver) = oneshot::channel();
        self.command_sender
            .send(WriteCommand::Shutdown { respond_to: sender })
            .map_err(|_| Error::Storage("Writer task has stopped".into()))?;

        receiver
            .await
            .map_err(|_| Error::Storage("Writer task dropped shutdown request".into()))?
    }
}

impl StorageBackend for QueuedFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let pending = self
            .pending
            .lock()
            .map_err(|_| Error::Storage("write queue lock poisoned".into()))?
            .get(key)
            .cloned();

        match pending {
            Some(value) => Ok(Some(value)),
            None => self.files.read(key),
        }
    }

    fn write(&mut self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;

        self.pending
            .lock()
            .map_err(|_| Error::Storage("write queue lock poisoned".into()))?
            .insert(key.to_string(), value.clone());

        self.command_sender
            .send(WriteCommand::Write {
                key: key.to_string(),
                value,
            })
            .map_err(|_| Error::Storage("Writer task has stopped".into()))
    }
}

async fn run_writer(
    files: FileBackend,
    pending: Arc<Mutex<HashMap<String, String>>>,
    mut command_receiver: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let mut last_error: Option<Error> = None;

    while let Some(command) = command_receiver.recv().await {
        match command {
            WriteCommand::Write { key, value } => {
                if let Err(e) = files.write_async(&key, &value).await {
                    log::error!("Queued write for {} failed: {}", key, e);
                    last_error = Some(Error::Storage(format!("write for {key} failed: {e}")));
                }
                settle(&pending, &key, &value);
            }
            WriteCommand::Flush { respond_to } => {
                let _ = respond_to.send(take_outcome(&mut last_error));
            }
            WriteCommand::Shutdown { respond_to } => {
                log::debug!("Write queue for {} shutting down", files.base_path().display());
                let _ = respond_to.send(take_outcome(&mut last_error));
                break;
            }
        }
    }
}

/// Drops the pending entry for `key` unless a newer value was queued since
fn settle(pending: &Mutex<HashMap<String, String>>, key: &str, value: &str) {
    match pending.lock() {
        Ok(mut pending) => {
            if pending.get(key).map(String::as_str) == Some(value) {
                pending.remove(key);
            }
        }
        Err(_) => log::error!("write queue lock poisoned"),
    }
}

fn take_outcome(last_error: &mut Option<Error>) -> Result<()> {
    match last_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CartStorage;
    use crate::models::NewCartItem;

    #[tokio::test]
    async fn test_writes_land_in_submission_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = QueuedFileBackend::spawn(dir.path());

        for i in 0..50 {
            backend.write("cart", format!("[{i}]")).unwrap();
        }
        backend.flush().await.unwrap();

        let on_disk = FileBackend::new(dir.path()).read("cart").unwrap();
        assert_eq!(on_disk.as_deref(), Some("[49]"));
    }

    #[tokio::test]
    async fn test_reads_see_queued_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = QueuedFileBackend::spawn(dir.path());

        backend.write("cart", "[]".to_string()).unwrap();
        assert_eq!(backend.read("cart").unwrap().as_deref(), Some("[]"));
        backend.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cart_storage_over_queue() {
        let dir = tempfile::tempdir().unwrap();
        let backend = QueuedFileBackend::spawn(dir.path());
        let mut storage = CartStorage::new(backend.clone(), "foodhub_cart");
        let items = vec![NewCartItem::new("m1", "Pizza", 200.0).into_line_item()];

        assert!(storage.save(&items));
        backend.flush().await.unwrap();

        let reloaded = CartStorage::new(FileBackend::new(dir.path()), "foodhub_cart").load();
        assert_eq!(reloaded, items);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported_and_forgotten() {
        // A regular file where the slot directory should be
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let mut backend = QueuedFileBackend::spawn(blocker.path());

        backend.write("cart", "[]".to_string()).unwrap();
        assert!(matches!(backend.flush().await, Err(Error::Storage(_))));
        assert_eq!(backend.read("cart").unwrap(), None);

        // Reported once
        backend.flush().await.unwrap();

        backend.write("cart", "[1]".to_string()).unwrap();
        assert!(backend.shutdown().await.is_err());
    }

    #[tokio::test]
    async fn test_write_after_shutdown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let backend = QueuedFileBackend::spawn(dir.path());
        let mut handle = backend.clone();

        backend.shutdown().await.unwrap();
        tokio::task::yield_now().await;

        assert!(handle.write("cart", "[]".to_string()).is_err());
    }
}
