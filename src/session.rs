use crate::auth::{GoogleIdentityProvider, IdentityProvider, UnconfiguredIdentityProvider, UserIdentity};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{AppError, AuthError};
use crate::feedback::{self, ClickFeedback};
use crate::metrics;
use crate::models::{Attachment, Firearm, Price};
use crate::pricing::{HttpPriceSource, PriceAggregator};
use crate::selection::{LoadoutSnapshot, SelectionEpoch, SelectionState};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Everything the view reads, behind one lock
#[derive(Debug, Default)]
struct ViewState {
    selection: SelectionState,
    search: String,
    zip: String,
    user: Option<UserIdentity>,
}

/// Owns the loadout builder state and drives price fetching and sign-in
///
/// Shareable across tasks; every method takes `&self`. The lock is never held
/// across a network call.
pub struct Session {
    catalog: Arc<Catalog>,
    state: RwLock<ViewState>,
    aggregator: PriceAggregator,
    identity: Arc<dyn IdentityProvider>,
    feedback: Arc<dyn ClickFeedback>,
}

impl Session {
    pub fn new(
        catalog: Arc<Catalog>,
        aggregator: PriceAggregator,
        identity: Arc<dyn IdentityProvider>,
        feedback: Arc<dyn ClickFeedback>,
    ) -> Self {
        Self {
            catalog,
            state: RwLock::new(ViewState::default()),
            aggregator,
            identity,
            feedback,
        }
    }

    /// Wire up the catalog, HTTP price source, identity provider and feedback
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let catalog = match &config.catalog.path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };

        let source = Arc::new(HttpPriceSource::new(&config.pricing)?);
        let aggregator = PriceAggregator::new(source, &config.pricing);

        let identity: Arc<dyn IdentityProvider> = match &config.auth {
            Some(auth) => Arc::new(GoogleIdentityProvider::new(auth.clone())),
            None => Arc::new(UnconfiguredIdentityProvider),
        };

        Ok(Self::new(
            Arc::new(catalog),
            aggregator,
            identity,
            feedback::from_config(config.interface.click_sound),
        ))
    }

    /// Select a firearm by name and wait for its attachment prices
    ///
    /// Fails with [`AppError::SelectionSuperseded`] if another selection (or
    /// going back to the catalog) happened while the prices were loading.
    pub async fn select_firearm(&self, name: &str) -> Result<LoadoutSnapshot, AppError> {
        let (epoch, attachments) = self.begin_selection(name).await?;
        self.load_prices(epoch, attachments).await;

        let snapshot = self.snapshot().await;
        if snapshot.epoch != epoch {
            return Err(AppError::SelectionSuperseded(name.to_string()));
        }
        Ok(snapshot)
    }

    /// Reset the selection to `name` without fetching
    ///
    /// Returns the new epoch and the attachments whose prices should be
    /// loaded with [`Session::load_prices`].
    pub async fn begin_selection(
        &self,
        name: &str,
    ) -> Result<(SelectionEpoch, Vec<Attachment>), AppError> {
        self.feedback.click();

        let firearm = self
            .catalog
            .find(name)
            .cloned()
            .ok_or_else(|| AppError::UnknownFirearm(name.to_string()))?;
        let attachments = firearm.attachments.clone();
        let firearm_name = firearm.name.clone();

        let epoch = self.state.write().await.selection.select_firearm(firearm);

        info!(
            firearm = %firearm_name,
            attachments = attachments.len(),
            epoch = epoch.value(),
            "Loading attachment prices"
        );
        Ok((epoch, attachments))
    }

    /// Fetch prices and publish each one into the cache as it arrives
    ///
    /// Stops early once the selection has moved past `epoch`; anything that
    /// resolves after that is dropped. Returns the number of entries stored.
    pub async fn load_prices(&self, epoch: SelectionEpoch, attachments: Vec<Attachment>) -> usize {
        let started = Instant::now();
        let mut results = self.aggregator.stream(attachments);
        let mut recorded = 0;

        while let Some((name, entry)) = results.next().await {
            let mut state = self.state.write().await;
            if state.selection.epoch() != epoch {
                debug!(
                    fetch_epoch = epoch.value(),
                    current_epoch = state.selection.epoch().value(),
                    "Selection changed, abandoning price fetch"
                );
                break;
            }
            if state.selection.record_price(epoch, &name, entry) {
                recorded += 1;
            }
        }

        metrics::record_price_batch(self.aggregator.strategy().as_str(), started.elapsed());
        recorded
    }

    /// Returns whether the attachment is selected afterwards
    pub async fn toggle_attachment(&self, name: &str) -> Result<bool, AppError> {
        self.feedback.click();
        let selected = self.state.write().await.selection.toggle_attachment(name)?;
        debug!(attachment = %name, selected, "Attachment toggled");
        Ok(selected)
    }

    pub async fn back_to_catalog(&self) {
        self.state.write().await.selection.clear();
    }

    pub async fn total_price(&self) -> Price {
        self.state.read().await.selection.total_price()
    }

    pub async fn snapshot(&self) -> LoadoutSnapshot {
        self.state.read().await.selection.snapshot()
    }

    pub async fn selected_firearm(&self) -> Option<Firearm> {
        self.state.read().await.selection.firearm().cloned()
    }

    pub async fn set_search(&self, text: impl Into<String>) {
        self.state.write().await.search = text.into();
    }

    pub async fn search(&self) -> String {
        self.state.read().await.search.clone()
    }

    /// Catalog entries matching the current search text
    pub async fn visible_firearms(&self) -> Vec<Firearm> {
        let query = self.search().await;
        self.catalog.search(&query).into_iter().cloned().collect()
    }

    /// Stored as entered
    pub async fn set_zip(&self, text: impl Into<String>) {
        self.state.write().await.zip = text.into();
    }

    pub async fn zip(&self) -> String {
        self.state.read().await.zip.clone()
    }

    /// Ask the identity provider to sign the user in
    ///
    /// On failure the user stays signed out and the error is returned.
    pub async fn sign_in(&self) -> Result<UserIdentity, AuthError> {
        let result = self.identity.sign_in().await;
        metrics::record_sign_in(result.is_ok());

        match result {
            Ok(user) => {
                info!(user = %user.display_name, "Signed in");
                self.state.write().await.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                Err(e)
            }
        }
    }

    pub async fn sign_out(&self) {
        self.state.write().await.user = None;
    }

    pub async fn user(&self) -> Option<UserIdentity> {
        self.state.read().await.user.clone()
    }
}
