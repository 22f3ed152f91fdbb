pub mod config;
pub mod ipc;
pub mod ws;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Ipc(#[from] ipc::IpcError),

    #[error(transparent)]
    Ws(#[from] ws::WsError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Model(#[from] models::ModelError),
}
