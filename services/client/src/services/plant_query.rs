//! services/client/src/services/plant_query.rs
//!
//! Turns filter selections and search input into remote calls, and every outcome
//! of those calls into an `Envelope`. Calls are made at most once; retrying is
//! the caller's decision.

use floripedia_core::domain::PlantSummary;
use floripedia_core::envelope::{Envelope, ErrorKind, Failure};
use floripedia_core::filter::FilterSelection;
use floripedia_core::ports::{PlantApi, PortError};
use floripedia_core::query::ListOptions;
use floripedia_core::recognition::extract_recognized_name;
use floripedia_core::validation::{is_valid_blooming_month, is_valid_image_size, MAX_IMAGE_BYTES};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct PlantQueryService {
    api: Arc<dyn PlantApi>,
}

impl PlantQueryService {
    pub fn new(api: Arc<dyn PlantApi>) -> Self {
        Self { api }
    }

    pub async fn list_plants(
        &self,
        filter: &FilterSelection,
        options: &ListOptions,
    ) -> Envelope<Vec<PlantSummary>> {
        check_month(options.blooming_month)?;
        let query = filter.to_query().with_options(options);
        self.api.fetch_plants(&query).await.map_err(|e| {
            error!("Failed to list plants: {:?}", e);
            Failure::from(e)
        })
    }

    pub async fn count_plants(
        &self,
        filter: &FilterSelection,
        keyword: Option<&str>,
        blooming_month: Option<u8>,
    ) -> Envelope<u64> {
        check_month(blooming_month)?;
        let query = filter.to_query().with_search(keyword, blooming_month);
        self.api.count_plants(&query).await.map_err(|e| {
            error!("Failed to count plants: {:?}", e);
            Failure::from(e)
        })
    }

    pub async fn plant_detail(&self, plant_id: &str) -> Envelope<PlantSummary> {
        self.api.fetch_plant(plant_id).await.map_err(|e| {
            error!("Failed to load plant {}: {:?}", plant_id, e);
            Failure::from(e)
        })
    }

    /// Favorites only filter by season, category group and color group.
    pub async fn list_favorites(
        &self,
        filter: &FilterSelection,
        options: &ListOptions,
    ) -> Envelope<Vec<PlantSummary>> {
        let query = filter.to_query().with_options(options).for_favorites();
        self.api.fetch_favorites(&query).await.map_err(|e| {
            error!("Failed to list favorites: {:?}", e);
            Failure::from(e)
        })
    }

    /// Returns whether the plant is favorited after the toggle.
    pub async fn toggle_favorite(&self, plant_id: &str) -> Envelope<bool> {
        self.api.toggle_favorite(plant_id).await.map_err(|e| {
            error!("Failed to toggle favorite {}: {:?}", plant_id, e);
            Failure::from(e)
        })
    }

    /// Three outcomes: the full record, a `PartialRecognition` carrying the name
    /// recovered from the error body, or a plain failure.
    pub async fn search_by_image(&self, image: &[u8]) -> Envelope<PlantSummary> {
        if !is_valid_image_size(image) {
            return Err(Failure::unknown(format!(
                "Image is larger than {} MiB",
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }
        match self.api.search_by_image(image).await {
            Ok(plant) => Ok(plant),
            Err(PortError::Status { code, body }) => {
                if let Some(name) = extract_recognized_name(&body) {
                    info!("Image search recognized '{}' without a full record", name);
                    return Err(Failure::partial_recognition(name));
                }
                error!("Image search failed with status {}", code);
                let failure = Failure::from_status(code);
                Err(match failure.kind {
                    ErrorKind::Unknown => Failure::unknown("The plant could not be recognized"),
                    _ => failure,
                })
            }
            Err(e) => {
                error!("Image search failed: {:?}", e);
                Err(Failure::from(e))
            }
        }
    }

    /// The 10 to 500 character bound on `situation` is checked by the caller.
    pub async fn recommend(&self, situation: &str) -> Envelope<PlantSummary> {
        self.api.recommend(situation).await.map_err(|e| {
            error!("Failed to get a recommendation: {:?}", e);
            Failure::from(e)
        })
    }
}

fn check_month(month: Option<u8>) -> Envelope<()> {
    match month {
        Some(m) if !is_valid_blooming_month(m) => Err(Failure::unknown(format!(
            "Blooming month must be between 1 and 12, got {}",
            m
        ))),
        _ => Ok(()),
    }
}
