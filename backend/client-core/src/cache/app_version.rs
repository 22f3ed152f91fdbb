use crate::cache::{FeatureCache, SettingsListener};
use crate::ipc::{DispatchingHandler, Event, EventKind};

use models::AppVersionInfo;

use std::sync::Arc;

use tokio::sync::watch;

/// Combined view of the running version and what the service knows about
/// newer releases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppVersionStatus {
    pub current_version: Option<String>,
    pub info: Option<AppVersionInfo>,
    pub show_beta_releases: bool,
}

impl AppVersionStatus {
    /// Unknown support status counts as supported.
    pub fn is_supported(&self) -> bool {
        self.info.as_ref().is_none_or(|info| info.supported)
    }

    /// Version to offer as an upgrade, honoring the beta preference. `None`
    /// when already running it.
    pub fn upgrade_version(&self) -> Option<&str> {
        let info = self.info.as_ref()?;
        let candidate = if self.show_beta_releases {
            info.suggested_upgrade.as_deref()
        } else {
            info.latest_stable.as_deref()
        }?;

        (self.current_version.as_deref() != Some(candidate)).then_some(candidate)
    }
}

#[derive(Clone)]
pub struct AppVersionInfoCache {
    status: watch::Receiver<AppVersionStatus>,
}

impl AppVersionInfoCache {
    pub fn new(dispatcher: &mut DispatchingHandler, settings: &SettingsListener) -> Self {
        let status_tx = Arc::new(watch::Sender::new(AppVersionStatus {
            show_beta_releases: settings
                .current()
                .is_some_and(|settings| settings.show_beta_releases),
            ..AppVersionStatus::default()
        }));
        let status = status_tx.subscribe();

        let info_tx = Arc::clone(&status_tx);
        dispatcher.register_handler(EventKind::AppVersionInfo, move |event| {
            if let Event::AppVersionInfo(info) = event {
                info_tx.send_modify(|status| status.info = Some(info.clone()));
            }
        });

        let version_tx = Arc::clone(&status_tx);
        dispatcher.register_handler(EventKind::CurrentVersion, move |event| {
            if let Event::CurrentVersion(version) = event {
                version_tx.send_modify(|status| status.current_version = Some(version.clone()));
            }
        });

        dispatcher.register_handler(EventKind::SettingsUpdate, move |event| {
            if let Event::SettingsUpdate(settings) = event {
                status_tx.send_if_modified(|status| {
                    let changed = status.show_beta_releases != settings.show_beta_releases;
                    status.show_beta_releases = settings.show_beta_releases;
                    changed
                });
            }
        });

        Self { status }
    }

    pub fn current(&self) -> AppVersionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppVersionStatus> {
        self.status.clone()
    }
}

impl FeatureCache for AppVersionInfoCache {
    fn name(&self) -> &'static str {
        "app version info cache"
    }
}
