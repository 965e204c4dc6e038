//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the remote plant API, the concrete
//! implementation of the `PlantApi` port from the `core` crate. It handles all
//! interactions with the server using `reqwest`.

use async_trait::async_trait;
use floripedia_core::domain::PlantSummary;
use floripedia_core::ports::{AuthProvider, PlantApi, PortError, PortResult};
use floripedia_core::query::QueryParams;
use reqwest::{multipart, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `PlantApi` port over HTTP.
///
/// Every request carries the current bearer token when one is available.
#[derive(Clone)]
pub struct HttpPlantApi {
    client: Client,
    base_url: String,
    auth: Arc<dyn AuthProvider>,
}

impl HttpPlantApi {
    /// Creates a new `HttpPlantApi`. `base_url` must end with a slash.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `path` under the base, followed by `id` escaped as a single segment.
    fn item_url(&self, path: &str, id: &str) -> PortResult<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(PortError::InvalidRequest(format!("'{}' is not a plant id", id)));
        }
        let mut url =
            Url::parse(&self.url(path)).map_err(|e| PortError::InvalidRequest(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| PortError::InvalidRequest(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth.current_token().await {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> PortResult<Response> {
        let request = self.authorized(builder).await;
        request.send().await.map_err(transport_error)
    }
}

/// Maps a `reqwest` failure onto the port's error vocabulary.
fn transport_error(e: reqwest::Error) -> PortError {
    if e.is_decode() {
        PortError::Decode(e.to_string())
    } else {
        PortError::Network(e.to_string())
    }
}

/// Decodes a 2xx body, or reports the status together with the raw error body.
async fn read_json<R: DeserializeOwned>(response: Response) -> PortResult<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(120).collect();
        warn!("Remote answered {}: {}", status, preview);
        return Err(PortError::Status {
            code: status.as_u16(),
            body,
        });
    }
    response.json::<R>().await.map_err(transport_error)
}

/// `image/png` for PNG magic bytes, `image/jpeg` otherwise.
fn image_content_type(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else {
        "image/jpeg"
    }
}

//=========================================================================================
// Wire Record Structs
//=========================================================================================

/// List/card payload.
#[derive(Deserialize)]
struct PlantCardRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(rename = "flowerLanguage", default)]
    flower_language: String,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    season: String,
    #[serde(rename = "preContent", default)]
    pre_content: Option<String>,
}
impl PlantCardRecord {
    fn to_domain(self) -> PlantSummary {
        PlantSummary {
            id: self.id,
            name: self.name,
            description: self.pre_content.unwrap_or_default(),
            image_url: self.image_url,
            season: self.season,
            flower_meaning: self.flower_language,
        }
    }
}

#[derive(Deserialize, Default)]
struct FlowerInfoRecord {
    #[serde(default)]
    language: String,
}

#[derive(Deserialize, Default)]
struct HorticultureRecord {
    #[serde(rename = "preContent", default)]
    pre_content: Option<String>,
}

/// Detail payload; only the fields the summary needs are read.
#[derive(Deserialize)]
struct PlantDetailRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    season: String,
    #[serde(rename = "flowerInfo", default)]
    flower_info: FlowerInfoRecord,
    #[serde(default)]
    horticulture: HorticultureRecord,
}
impl PlantDetailRecord {
    fn to_domain(self) -> PlantSummary {
        let image_url = self.image_url.or_else(|| self.images.into_iter().next());
        PlantSummary {
            id: self.id,
            name: self.name,
            description: self.horticulture.pre_content.unwrap_or_default(),
            image_url,
            season: self.season,
            flower_meaning: self.flower_info.language,
        }
    }
}

/// Image search payload.
#[derive(Deserialize)]
struct SearchResultRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(rename = "scientificName", default)]
    scientific_name: String,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    season: String,
}
impl SearchResultRecord {
    fn to_domain(self) -> PlantSummary {
        PlantSummary {
            id: self.id,
            name: self.name,
            description: self.scientific_name,
            image_url: self.image_url,
            season: self.season,
            flower_meaning: String::new(),
        }
    }
}

/// Recommendation payload.
#[derive(Deserialize)]
struct RecommendationRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    season: String,
    #[serde(default)]
    recommendation: String,
}
impl RecommendationRecord {
    fn to_domain(self) -> PlantSummary {
        PlantSummary {
            id: self.id,
            name: self.name,
            description: self.recommendation,
            image_url: self.image_url,
            season: self.season,
            flower_meaning: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct CountRecord {
    count: u64,
}

#[derive(Deserialize)]
struct FavoriteToggleRecord {
    #[serde(rename = "isFavorite")]
    is_favorite: bool,
}

//=========================================================================================
// `PlantApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl PlantApi for HttpPlantApi {
    async fn fetch_plants(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>> {
        debug!("GET plants {:?}", query.to_pairs());
        let builder = self.client.get(self.url("plants")).query(&query.to_pairs());
        let records: Vec<PlantCardRecord> = read_json(self.send(builder).await?).await?;
        Ok(records.into_iter().map(PlantCardRecord::to_domain).collect())
    }

    async fn count_plants(&self, query: &QueryParams) -> PortResult<u64> {
        let builder = self
            .client
            .get(self.url("plants/count"))
            .query(&query.to_pairs());
        let record: CountRecord = read_json(self.send(builder).await?).await?;
        Ok(record.count)
    }

    async fn fetch_plant(&self, plant_id: &str) -> PortResult<PlantSummary> {
        let builder = self.client.get(self.item_url("plants", plant_id)?);
        let record: PlantDetailRecord = read_json(self.send(builder).await?).await?;
        Ok(record.to_domain())
    }

    async fn fetch_favorites(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>> {
        let builder = self
            .client
            .get(self.url("plants/favorites"))
            .query(&query.to_pairs());
        let records: Vec<PlantCardRecord> = read_json(self.send(builder).await?).await?;
        Ok(records.into_iter().map(PlantCardRecord::to_domain).collect())
    }

    async fn toggle_favorite(&self, plant_id: &str) -> PortResult<bool> {
        let builder = self
            .client
            .post(self.item_url("users/me/favorites", plant_id)?);
        let record: FavoriteToggleRecord = read_json(self.send(builder).await?).await?;
        Ok(record.is_favorite)
    }

    async fn search_by_image(&self, image: &[u8]) -> PortResult<PlantSummary> {
        let content_type = image_content_type(image);
        let part = multipart::Part::bytes(image.to_vec())
            .file_name("plant")
            .mime_str(content_type)
            .map_err(|e| PortError::Decode(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        debug!("POST plants/search/image ({} bytes)", image.len());
        let builder = self
            .client
            .post(self.url("plants/search/image"))
            .multipart(form);
        let record: SearchResultRecord = read_json(self.send(builder).await?).await?;
        Ok(record.to_domain())
    }

    async fn recommend(&self, situation: &str) -> PortResult<PlantSummary> {
        let builder = self
            .client
            .post(self.url("plants/recommend"))
            .query(&[("situation", situation)]);
        let record: RecommendationRecord = read_json(self.send(builder).await?).await?;
        Ok(record.to_domain())
    }
}
