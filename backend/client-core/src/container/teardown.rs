//! Ordered teardown steps.

use crate::error::ipc::IpcError;

use log::{debug, error};

type TeardownStep<'a> = Box<dyn FnOnce() -> Result<(), IpcError> + 'a>;

/// Named steps run in insertion order. A failing step is logged and the chain
/// moves on: every step always runs.
#[derive(Default)]
pub struct TeardownChain<'a> {
    steps: Vec<(&'static str, TeardownStep<'a>)>,
}

/// What happened when a chain ran.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub completed: Vec<&'static str>,
    pub failed: Vec<(&'static str, IpcError)>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<'a> TeardownChain<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn then<F>(mut self, name: &'static str, step: F) -> Self
    where
        F: FnOnce() -> Result<(), IpcError> + 'a,
    {
        self.steps.push((name, Box::new(step)));
        self
    }

    pub fn run(self) -> TeardownReport {
        let mut report = TeardownReport::default();

        for (name, step) in self.steps {
            match step() {
                Ok(()) => {
                    debug!("Teardown step '{name}' done");
                    report.completed.push(name);
                }
                Err(step_error) => {
                    error!("Teardown step '{name}' failed: {step_error}");
                    report.failed.push((name, step_error));
                }
            }
        }

        report
    }
}
