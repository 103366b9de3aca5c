use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

use super::batch::{BatchOutcome, convert_all};
use super::convert::convert_file;
use super::selection::SelectedFile;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub file_name: String,
}

#[derive(Debug)]
pub enum BatchEvent {
    Progress(BatchProgress),
    Finished(BatchOutcome),
    /// The worker hung up without sending `Finished`.
    Lost,
}

/// Runs one batch off the UI thread. The worker owns its copy of the files
/// and shares no state with the window; it only talks through the channel.
pub struct BatchWorker {
    rx: Receiver<BatchEvent>,
}

impl BatchWorker {
    pub fn spawn(files: Vec<SelectedFile>) -> std::io::Result<Self> {
        let (tx, rx) = channel();

        thread::Builder::new()
            .name("webp-batch".to_string())
            .spawn(move || {
                let outcome = convert_all(&files, convert_file, |current, total, file| {
                    let _ = tx.send(BatchEvent::Progress(BatchProgress {
                        current,
                        total,
                        file_name: file.name().to_string(),
                    }));
                });
                let _ = tx.send(BatchEvent::Finished(outcome));
            })?;

        Ok(Self { rx })
    }

    /// Drains everything the worker has sent so far without blocking.
    pub fn poll(&self) -> Vec<BatchEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.push(BatchEvent::Lost);
                    break;
                }
            }
        }
        events
    }
}
