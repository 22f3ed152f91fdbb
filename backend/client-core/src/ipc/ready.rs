//! One-shot "service ready" notification.

use crate::ipc::request::ListenerId;

use log::debug;
use tokio::sync::oneshot;

/// Callback run once with the owner when the service is ready.
pub type ReadyCallback<T> = Box<dyn FnOnce(&T) + Send>;

/// Settable-once flag with a callback and any number of waiters.
///
/// The first [`settle`](Self::settle) hands back the callback and wakes every
/// waiter; later calls do nothing.
pub struct ReadySignal<T> {
    callback: Option<ReadyCallback<T>>,
    waiters: Vec<oneshot::Sender<ListenerId>>,
    settled: Option<ListenerId>,
}

impl<T> ReadySignal<T> {
    pub fn new(callback: ReadyCallback<T>) -> Self {
        Self {
            callback: Some(callback),
            waiters: Vec::new(),
            settled: None,
        }
    }

    /// A receiver resolved with the listener id. Resolves immediately if
    /// already settled; is dropped unresolved if the signal is abandoned.
    pub fn waiter(&mut self) -> oneshot::Receiver<ListenerId> {
        let (tx, rx) = oneshot::channel();

        match self.settled {
            Some(id) => {
                let _ = tx.send(id);
            }
            None if self.callback.is_none() => {
                // abandoned: tx dropped
            }
            None => self.waiters.push(tx),
        }

        rx
    }

    /// Mark ready. Returns the callback for the caller to invoke, only on the
    /// first call.
    pub fn settle(&mut self, id: ListenerId) -> Option<ReadyCallback<T>> {
        if self.settled.is_some() {
            return None;
        }

        let callback = self.callback.take()?;
        self.settled = Some(id);

        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(id);
        }

        Some(callback)
    }

    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }

    /// Give up without settling: the callback is dropped uninvoked and waiters
    /// observe a closed channel.
    pub fn abandon(&mut self) {
        if self.callback.take().is_some() {
            debug!("Ready signal abandoned before the service became ready");
        }
        self.waiters.clear();
    }
}
