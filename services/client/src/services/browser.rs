//! services/client/src/services/browser.rs
//!
//! One browsing session: the current filter, the last page shown, the recently
//! viewed list and the identity-scoped state, wired to the query service and
//! the auth gate. Failures go through the gate and never touch the state.

use floripedia_core::domain::{PlantSummary, RecentEntry, Token};
use floripedia_core::envelope::{Envelope, ErrorKind, Failure};
use floripedia_core::filter::{FilterAction, FilterError, FilterSelection};
use floripedia_core::ports::{AuthProvider, PlantApi};
use floripedia_core::query::ListOptions;
use floripedia_core::recency::DEFAULT_PAGE_SIZE;
use floripedia_core::validation::is_valid_situation;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::services::auth_gate::{AuthGate, Disposition};
use crate::services::plant_query::PlantQueryService;
use crate::services::recency_store::RecencyStore;
use crate::services::token::TokenStore;

/// A page of results together with the total matching the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantPage {
    pub plants: Vec<PlantSummary>,
    pub total: u64,
}

pub struct Browser {
    query: PlantQueryService,
    gate: Arc<AuthGate>,
    tokens: Arc<TokenStore>,
    recents: RecencyStore,
    filter: FilterSelection,
    options: ListOptions,
    page: PlantPage,
    favorites: HashSet<String>,
}

impl Browser {
    pub fn new(
        api: Arc<dyn PlantApi>,
        recents: RecencyStore,
        tokens: Arc<TokenStore>,
        gate: Arc<AuthGate>,
    ) -> Self {
        Self {
            query: PlantQueryService::new(api),
            gate,
            tokens,
            recents,
            filter: FilterSelection::new(),
            options: ListOptions::default(),
            page: PlantPage::default(),
            favorites: HashSet::new(),
        }
    }

    // --- Filter state ---

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn dispatch(&mut self, action: &FilterAction) -> &FilterSelection {
        self.filter = self.filter.apply(action);
        &self.filter
    }

    /// Selects a value that arrived as text, e.g. from a deep link or the CLI.
    pub fn select_checked(&mut self, axis: &str, value: &str) -> Result<&FilterSelection, FilterError> {
        self.filter = self.filter.select_checked(axis, value)?;
        Ok(&self.filter)
    }

    pub fn set_options(&mut self, options: ListOptions) {
        self.options = options;
    }

    /// The last page that loaded successfully.
    pub fn page(&self) -> &PlantPage {
        &self.page
    }

    // --- Browsing ---

    /// Fetches the list and the total for the current filter side by side.
    pub async fn refresh(&mut self) -> Envelope<&PlantPage> {
        let keyword = self.options.keyword.clone();
        let (plants, total) = futures::join!(
            self.query.list_plants(&self.filter, &self.options),
            self.query
                .count_plants(&self.filter, keyword.as_deref(), self.options.blooming_month),
        );
        let page = match (plants, total) {
            (Ok(plants), Ok(total)) => PlantPage { plants, total },
            (Err(e), _) | (_, Err(e)) => return Err(self.fail(e).await),
        };
        self.page = page;
        Ok(&self.page)
    }

    pub async fn count(&mut self) -> Envelope<u64> {
        let counted = self
            .query
            .count_plants(
                &self.filter,
                self.options.keyword.as_deref(),
                self.options.blooming_month,
            )
            .await;
        match counted {
            Ok(total) => Ok(total),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Loads a plant's detail and records it as recently viewed.
    pub async fn open_detail(&mut self, plant_id: &str) -> Envelope<PlantSummary> {
        match self.query.plant_detail(plant_id).await {
            Ok(plant) => {
                self.recents.add(RecentEntry::from(&plant));
                Ok(plant)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn search_by_image(&mut self, image: &[u8]) -> Envelope<PlantSummary> {
        match self.query.search_by_image(image).await {
            Ok(plant) => Ok(plant),
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn recommend(&mut self, situation: &str) -> Envelope<PlantSummary> {
        if !is_valid_situation(situation) {
            let failure = Failure::unknown("Describe the situation in 10 to 500 characters");
            return Err(self.fail(failure).await);
        }
        match self.query.recommend(situation).await {
            Ok(plant) => Ok(plant),
            Err(e) => Err(self.fail(e).await),
        }
    }

    // --- Identity-scoped ---

    pub async fn favorites(&mut self) -> Envelope<Vec<PlantSummary>> {
        self.require_login().await?;
        match self.query.list_favorites(&self.filter, &self.options).await {
            Ok(plants) => {
                self.favorites = plants.iter().map(|p| p.id.clone()).collect();
                Ok(plants)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn toggle_favorite(&mut self, plant_id: &str) -> Envelope<bool> {
        self.require_login().await?;
        match self.query.toggle_favorite(plant_id).await {
            Ok(true) => {
                self.favorites.insert(plant_id.to_string());
                Ok(true)
            }
            Ok(false) => {
                self.favorites.remove(plant_id);
                Ok(false)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Whether the plant is known to be a favorite in this session.
    pub fn is_favorite(&self, plant_id: &str) -> bool {
        self.favorites.contains(plant_id)
    }

    pub async fn login(&mut self, token: Token) {
        self.tokens.set(token).await;
        info!("Logged in");
    }

    pub async fn logout(&mut self) {
        self.tokens.clear().await;
        self.favorites.clear();
        info!("Logged out");
    }

    // --- Recently viewed ---

    pub fn recent(&self) -> Vec<RecentEntry> {
        self.recents.list()
    }

    pub fn recent_pages(&self) -> Vec<Vec<RecentEntry>> {
        self.recents.paginate(DEFAULT_PAGE_SIZE)
    }

    pub fn clear_recent(&self) {
        self.recents.clear();
    }

    // --- Failure handling ---

    async fn require_login(&mut self) -> Envelope<()> {
        if self.tokens.is_logged_in().await {
            return Ok(());
        }
        let failure = Failure::new(ErrorKind::Unauthorized, "Login required");
        Err(self.fail(failure).await)
    }

    async fn fail(&mut self, failure: Failure) -> Failure {
        if self.gate.handle(&failure).await == Disposition::RequiresLogin {
            self.favorites.clear();
        }
        failure
    }
}
