use crate::cache::{FeatureCache, lock_pending};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use common::RedactedSecret;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{debug, error};
use tokio::sync::{oneshot, watch};

type PendingTokens = Arc<Mutex<VecDeque<oneshot::Sender<RedactedSecret>>>>;

/// Short-lived web authentication tokens.
///
/// Every `AuthToken` event settles the oldest live waiter. Waiters whose
/// receiver was dropped are skipped.
#[derive(Clone)]
pub struct AuthTokenCache {
    connection: WeakConnection,
    pending: PendingTokens,
    latest: watch::Receiver<Option<RedactedSecret>>,
}

impl AuthTokenCache {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let pending = PendingTokens::default();
        let (latest_tx, latest) = watch::channel(None);

        let handler_pending = Arc::clone(&pending);
        dispatcher.register_handler(EventKind::AuthToken, move |event| {
            let Event::AuthToken(token) = event else {
                return;
            };

            latest_tx.send_replace(Some(token.clone()));

            let mut pending = match lock_pending(&handler_pending) {
                Ok(pending) => pending,
                Err(lock_error) => {
                    error!("Dropping auth token: {lock_error}");
                    return;
                }
            };

            while let Some(waiter) = pending.pop_front() {
                if waiter.send(token.clone()).is_ok() {
                    return;
                }
            }
            debug!("Auth token arrived with no live waiter");
        });

        Self {
            connection,
            pending,
            latest,
        }
    }

    /// Request a fresh token. The receiver resolves with the next token the
    /// service delivers, and is closed if the cache is destroyed first.
    pub fn fetch_auth_token(&self) -> Result<oneshot::Receiver<RedactedSecret>, IpcError> {
        let (tx, rx) = oneshot::channel();
        lock_pending(&self.pending)?.push_back(tx);

        if let Err(send_error) = self.connection.send(Request::FetchAuthToken) {
            drop(rx);
            lock_pending(&self.pending)?.retain(|waiter| !waiter.is_closed());
            return Err(send_error);
        }

        Ok(rx)
    }

    pub fn latest(&self) -> Option<RedactedSecret> {
        self.latest.borrow().clone()
    }

    pub fn pending_count(&self) -> usize {
        lock_pending(&self.pending).map_or(0, |pending| pending.len())
    }
}

impl FeatureCache for AuthTokenCache {
    fn name(&self) -> &'static str {
        "auth token cache"
    }

    fn on_destroy(&mut self) -> Result<(), IpcError> {
        lock_pending(&self.pending)?.clear();
        Ok(())
    }
}
