//! services/client/tests/browse_flow.rs
//!
//! Drives a whole browsing session through the `Browser` facade against an
//! in-memory plant API and store.

use async_trait::async_trait;
use client_lib::adapters::{FileStore, MemoryStore};
use client_lib::services::{AuthGate, Browser, RecencyStore, TokenStore, UiEvent};
use floripedia_core::domain::{PlantSummary, Token};
use floripedia_core::envelope::ErrorKind;
use floripedia_core::filter::{FilterAction, FilterAxis};
use floripedia_core::ports::{AuthProvider, KeyValueStore, PlantApi, PortError, PortResult};
use floripedia_core::query::{ListOptions, QueryParams};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

fn plant(id: &str, name: &str) -> PlantSummary {
    PlantSummary {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} in bloom", name),
        image_url: Some(format!("https://img.example.com/{}.jpg", id)),
        season: "SPRING".to_string(),
        flower_meaning: String::new(),
    }
}

/// Answers from a fixed catalogue; favorites and image search are scripted.
#[derive(Default)]
struct CatalogueApi {
    catalogue: Vec<PlantSummary>,
    favorite_status: Mutex<Option<PortError>>,
    image_error: Option<PortError>,
    queries: Mutex<Vec<QueryParams>>,
}

impl CatalogueApi {
    fn new(catalogue: Vec<PlantSummary>) -> Self {
        Self {
            catalogue,
            ..Self::default()
        }
    }

    fn matching(&self, query: &QueryParams) -> Vec<PlantSummary> {
        self.queries.lock().unwrap().push(query.clone());
        let season = query.axis(FilterAxis::Season);
        self.catalogue
            .iter()
            .filter(|p| season.map_or(true, |s| p.season == s))
            .take(query.limit.unwrap_or(u32::MAX) as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlantApi for CatalogueApi {
    async fn fetch_plants(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>> {
        Ok(self.matching(query))
    }

    async fn count_plants(&self, query: &QueryParams) -> PortResult<u64> {
        Ok(self.matching(query).len() as u64)
    }

    async fn fetch_plant(&self, plant_id: &str) -> PortResult<PlantSummary> {
        self.catalogue
            .iter()
            .find(|p| p.id == plant_id)
            .cloned()
            .ok_or(PortError::Status {
                code: 404,
                body: r#"{"detail": "Plant not found"}"#.to_string(),
            })
    }

    async fn fetch_favorites(&self, query: &QueryParams) -> PortResult<Vec<PlantSummary>> {
        Ok(self.matching(query))
    }

    async fn toggle_favorite(&self, _plant_id: &str) -> PortResult<bool> {
        match self.favorite_status.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }

    async fn search_by_image(&self, _image: &[u8]) -> PortResult<PlantSummary> {
        match &self.image_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.catalogue[0].clone()),
        }
    }

    async fn recommend(&self, _situation: &str) -> PortResult<PlantSummary> {
        Ok(self.catalogue[0].clone())
    }
}

struct Session {
    browser: Browser,
    api: Arc<CatalogueApi>,
    tokens: Arc<TokenStore>,
    events: mpsc::UnboundedReceiver<UiEvent>,
}

fn session_with(api: CatalogueApi, storage: Arc<dyn KeyValueStore>) -> Session {
    let api = Arc::new(api);
    let tokens = Arc::new(TokenStore::restore(storage.clone()));
    let (tx, events) = mpsc::unbounded_channel();
    let gate = Arc::new(AuthGate::new(tokens.clone(), tx, chrono::Duration::seconds(5)));
    Session {
        browser: Browser::new(api.clone(), RecencyStore::new(storage), tokens.clone(), gate),
        api,
        tokens,
        events,
    }
}

fn session(api: CatalogueApi) -> Session {
    session_with(api, Arc::new(MemoryStore::new()))
}

fn drain(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn spring_listing_returns_records_in_order() {
    let mut summer = plant("3", "Lotus");
    summer.season = "SUMMER".to_string();
    let mut s = session(CatalogueApi::new(vec![
        plant("1", "Cherry Blossom"),
        summer,
        plant("2", "Tulip"),
    ]));

    s.browser.dispatch(&FilterAction::Select {
        axis: FilterAxis::Season,
        value: "SPRING".to_string(),
    });
    s.browser.set_options(ListOptions {
        limit: 5,
        ..ListOptions::default()
    });
    let page = s.browser.refresh().await.unwrap().clone();

    let names: Vec<&str> = page.plants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cherry Blossom", "Tulip"]);
    assert_eq!(page.total, 2);

    let queries = s.api.queries.lock().unwrap();
    let list_query = queries.iter().find(|q| q.limit.is_some()).unwrap();
    assert_eq!(list_query.limit, Some(5));
    assert_eq!(list_query.season.as_deref(), Some("SPRING"));
}

#[tokio::test]
async fn rejected_token_logs_out_with_a_single_prompt() {
    let api = CatalogueApi::new(vec![plant("1", "Peony")]);
    *api.favorite_status.lock().unwrap() = Some(PortError::Status {
        code: 401,
        body: r#"{"detail": "Token expired"}"#.to_string(),
    });
    let mut s = session(api);
    s.browser.login(Token::new("expired")).await;

    let first = s.browser.toggle_favorite("1").await.unwrap_err();
    assert_eq!(first.kind, ErrorKind::Unauthorized);
    assert_eq!(s.tokens.current_token().await, None);

    // Logged out now; the second attempt is refused locally and not re-announced.
    let second = s.browser.toggle_favorite("1").await.unwrap_err();
    assert_eq!(second.kind, ErrorKind::Unauthorized);

    let events = drain(&mut s.events);
    let toasts = events
        .iter()
        .filter(|e| matches!(e, UiEvent::Toast(_)))
        .count();
    assert_eq!(toasts, 1);
    assert!(events.contains(&UiEvent::NavigateToLogin));
}

#[tokio::test]
async fn opened_plants_become_recent() {
    let mut s = session(CatalogueApi::new(vec![
        plant("1", "Rose"),
        plant("2", "Lily"),
    ]));

    s.browser.open_detail("1").await.unwrap();
    s.browser.open_detail("2").await.unwrap();
    s.browser.open_detail("1").await.unwrap();
    let missing = s.browser.open_detail("404").await.unwrap_err();
    assert_eq!(missing.kind, ErrorKind::NotFound);

    let ids: Vec<String> = s.browser.recent().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["1", "2"]);
    let first = &s.browser.recent()[0];
    assert_eq!(first.description.as_deref(), Some("Rose in bloom"));
}

#[tokio::test]
async fn recents_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let catalogue = vec![plant("1", "Rose"), plant("2", "Lily")];

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let mut s = session_with(CatalogueApi::new(catalogue.clone()), storage);
    s.browser.open_detail("2").await.unwrap();
    s.browser.open_detail("1").await.unwrap();
    drop(s);

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let s = session_with(CatalogueApi::new(catalogue), storage);
    let ids: Vec<String> = s.browser.recent().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn corrupted_recents_read_as_empty() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.put("recent_plants", b"[{\"id\": 1,").unwrap();
    let mut s = session_with(CatalogueApi::new(vec![plant("1", "Rose")]), storage);

    assert!(s.browser.recent().is_empty());
    assert!(s.browser.recent_pages().is_empty());

    s.browser.open_detail("1").await.unwrap();
    assert_eq!(s.browser.recent().len(), 1);
}

#[tokio::test]
async fn image_search_recovers_the_recognized_name() {
    let api = CatalogueApi {
        catalogue: vec![plant("1", "Rose")],
        image_error: Some(PortError::Status {
            code: 500,
            body: "{'detail': 'lookup failed', 'name': 'Echeveria'}".to_string(),
        }),
        ..CatalogueApi::default()
    };
    let mut s = session(api);

    let err = s
        .browser
        .search_by_image(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        .await
        .unwrap_err();
    assert_eq!(err.recognized_name(), Some("Echeveria"));
    assert_eq!(
        drain(&mut s.events),
        vec![UiEvent::Recognized {
            name: "Echeveria".to_string()
        }]
    );
    assert!(s.browser.recent().is_empty());
}
