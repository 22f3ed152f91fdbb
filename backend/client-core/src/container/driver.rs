use crate::container::ServiceConnectionContainer;

use log::info;
use tokio::sync::{mpsc, watch};

/// Why [`ServiceConnectionContainer::drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The inbound stream ended: the service went away.
    ChannelClosed,
    /// Shutdown was requested, or the shutdown sender was dropped.
    Shutdown,
}

impl ServiceConnectionContainer {
    /// Own the container on the current task and dispatch every inbound
    /// payload in arrival order until the stream closes or shutdown is
    /// signalled. The container is torn down before returning.
    pub async fn drive(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<Vec<u8>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> DriveOutcome {
        let outcome = if *shutdown.borrow_and_update() {
            DriveOutcome::Shutdown
        } else {
            loop {
                tokio::select! {
                    payload = inbound.recv() => match payload {
                        Some(raw) => self.dispatch(&raw),
                        None => break DriveOutcome::ChannelClosed,
                    },
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow_and_update() {
                            break DriveOutcome::Shutdown;
                        }
                    }
                }
            }
        };

        info!("Service connection driver stopping: {outcome:?}");
        self.on_destroy();

        outcome
    }
}
