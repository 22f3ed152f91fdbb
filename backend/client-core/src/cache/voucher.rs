use crate::cache::{FeatureCache, lock_pending};
use crate::error::ipc::IpcError;
use crate::ipc::{DispatchingHandler, Event, EventKind, Request, WeakConnection};

use models::VoucherSubmissionResult;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, error};
use tokio::sync::oneshot;

type PendingSubmissions = Arc<Mutex<HashMap<String, Vec<oneshot::Sender<VoucherSubmissionResult>>>>>;

/// Voucher redemption. Results are matched to submissions by voucher code.
#[derive(Clone)]
pub struct VoucherRedeemer {
    connection: WeakConnection,
    pending: PendingSubmissions,
}

impl VoucherRedeemer {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let pending = PendingSubmissions::default();

        let handler_pending = Arc::clone(&pending);
        dispatcher.register_handler(EventKind::VoucherSubmissionResult, move |event| {
            let Event::VoucherSubmissionResult(result) = event else {
                return;
            };

            let waiters = match lock_pending(&handler_pending) {
                Ok(mut pending) => pending.remove(&result.voucher),
                Err(lock_error) => {
                    error!("Dropping voucher result: {lock_error}");
                    return;
                }
            };

            match waiters {
                Some(waiters) => {
                    for waiter in waiters {
                        let _ = waiter.send(result.clone());
                    }
                }
                None => debug!("Voucher result with no pending submission"),
            }
        });

        Self {
            connection,
            pending,
        }
    }

    /// Submit `code`. The receiver resolves with the service's verdict for
    /// that code, and is closed if the cache is destroyed first.
    pub fn submit(
        &self,
        code: impl Into<String>,
    ) -> Result<oneshot::Receiver<VoucherSubmissionResult>, IpcError> {
        let code = code.into();
        let (tx, rx) = oneshot::channel();

        lock_pending(&self.pending)?
            .entry(code.clone())
            .or_default()
            .push(tx);

        if let Err(send_error) = self.connection.send(Request::SubmitVoucher(code.clone())) {
            drop(rx);
            let mut pending = lock_pending(&self.pending)?;
            if let Some(waiters) = pending.get_mut(&code) {
                waiters.retain(|waiter| !waiter.is_closed());
                if waiters.is_empty() {
                    pending.remove(&code);
                }
            }
            return Err(send_error);
        }

        Ok(rx)
    }

    pub fn pending_count(&self) -> usize {
        lock_pending(&self.pending).map_or(0, |pending| pending.values().map(Vec::len).sum())
    }
}

impl FeatureCache for VoucherRedeemer {
    fn name(&self) -> &'static str {
        "voucher redeemer"
    }

    fn on_destroy(&mut self) -> Result<(), IpcError> {
        lock_pending(&self.pending)?.clear();
        Ok(())
    }
}
