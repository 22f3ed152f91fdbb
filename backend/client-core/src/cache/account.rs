use crate::cache::{FeatureCache, subscribe_latest};
use crate::error::ipc::IpcError;
use crate::ipc::{AccountCreation, DispatchingHandler, Event, EventKind, Request, WeakConnection};

use common::RedactedSecret;
use models::LoginStatus;

use log::debug;
use tokio::sync::watch;

/// Account expiry, account history, and the outcome of the last create/login.
#[derive(Clone)]
pub struct AccountDataSource {
    connection: WeakConnection,
    expiry: watch::Receiver<Option<String>>,
    history: watch::Receiver<Option<RedactedSecret>>,
    creation: watch::Receiver<Option<AccountCreation>>,
    login: watch::Receiver<Option<LoginStatus>>,
}

impl AccountDataSource {
    pub fn new(connection: WeakConnection, dispatcher: &mut DispatchingHandler) -> Self {
        let expiry = subscribe_latest(dispatcher, EventKind::AccountExpiry, None, |event| {
            match event {
                Event::AccountExpiry(expiry) => Some(expiry.clone()),
                _ => None,
            }
        });

        let history = subscribe_latest(dispatcher, EventKind::AccountHistory, None, |event| {
            match event {
                Event::AccountHistory(history) => Some(history.clone()),
                _ => None,
            }
        });

        let creation = subscribe_latest(dispatcher, EventKind::AccountCreation, None, |event| {
            match event {
                Event::AccountCreation(creation) => Some(Some(creation.clone())),
                _ => None,
            }
        });

        let login = subscribe_latest(dispatcher, EventKind::LoginResult, None, |event| {
            match event {
                Event::LoginResult(status) => {
                    debug!("Login result: {status:?}");
                    Some(Some(*status))
                }
                _ => None,
            }
        });

        Self {
            connection,
            expiry,
            history,
            creation,
            login,
        }
    }

    /// RFC 3339 expiry of the logged-in account, if known.
    pub fn account_expiry(&self) -> Option<String> {
        self.expiry.borrow().clone()
    }

    /// Last account number used on this device.
    pub fn account_history(&self) -> Option<RedactedSecret> {
        self.history.borrow().clone()
    }

    pub fn last_creation(&self) -> Option<AccountCreation> {
        self.creation.borrow().clone()
    }

    pub fn last_login(&self) -> Option<LoginStatus> {
        *self.login.borrow()
    }

    pub fn subscribe_expiry(&self) -> watch::Receiver<Option<String>> {
        self.expiry.clone()
    }

    pub fn subscribe_login(&self) -> watch::Receiver<Option<LoginStatus>> {
        self.login.clone()
    }

    pub fn create_account(&self) -> Result<(), IpcError> {
        self.connection.send(Request::CreateAccount)
    }

    pub fn login(&self, account_number: RedactedSecret) -> Result<(), IpcError> {
        self.connection.send(Request::Login(account_number))
    }

    pub fn logout(&self) -> Result<(), IpcError> {
        self.connection.send(Request::Logout)
    }

    pub fn fetch_account_expiry(&self) -> Result<(), IpcError> {
        self.connection.send(Request::FetchAccountExpiry)
    }

    pub fn fetch_account_history(&self) -> Result<(), IpcError> {
        self.connection.send(Request::FetchAccountHistory)
    }

    pub fn clear_account_history(&self) -> Result<(), IpcError> {
        self.connection.send(Request::ClearAccountHistory)
    }
}

impl FeatureCache for AccountDataSource {
    fn name(&self) -> &'static str {
        "account data source"
    }

    fn prime(&self) -> Result<(), IpcError> {
        self.fetch_account_expiry()?;
        self.fetch_account_history()
    }
}
