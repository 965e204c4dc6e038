//! services/client/src/bin/floripedia.rs

use clap::{Args, Parser, Subcommand};
use client_lib::{
    adapters::{FileStore, HttpPlantApi},
    config::Config,
    error::ClientError,
    services::{AuthGate, Browser, RecencyStore, TokenStore, UiEvent},
};
use floripedia_core::domain::{PlantSummary, RecentEntry, Token};
use floripedia_core::ports::{AuthProvider, KeyValueStore, PlantApi};
use floripedia_core::query::ListOptions;
use floripedia_core::validation::{is_valid_image_format, is_valid_search_keyword};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "floripedia", about = "Browse the plant encyclopedia from the terminal")]
struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List plants matching the filters.
    List(FilterArgs),
    /// Count plants matching the filters.
    Count(FilterArgs),
    /// Show one plant and remember it as recently viewed.
    Detail { id: String },
    /// Show the recently viewed plants, newest first.
    Recent,
    /// Forget every recently viewed plant.
    RecentClear,
    /// List your favorite plants.
    Favorites(FilterArgs),
    /// Add or remove a plant from your favorites.
    Favorite { id: String },
    /// Ask for a plant that suits a situation.
    Recommend { situation: String },
    /// Identify a plant from a JPEG or PNG photo.
    SearchImage { path: PathBuf },
    /// Store the token issued by the identity provider.
    Login { token: String },
    Logout,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    season: Option<String>,
    #[arg(long)]
    category_group: Option<String>,
    #[arg(long)]
    color_group: Option<String>,
    #[arg(long)]
    scent_group: Option<String>,
    #[arg(long)]
    flower_group: Option<String>,
    #[arg(long)]
    story_genre: Option<String>,
    #[arg(long)]
    keyword: Option<String>,
    /// Blooming month, 1 to 12.
    #[arg(long)]
    month: Option<u8>,
    #[arg(long, default_value = "20")]
    limit: u32,
    #[arg(long, default_value = "0")]
    skip: u32,
}

impl FilterArgs {
    /// Applies the flags to the browser's filter and list options.
    fn apply(&self, browser: &mut Browser) -> Result<(), ClientError> {
        let axes = [
            ("season", &self.season),
            ("category_group", &self.category_group),
            ("color_group", &self.color_group),
            ("scent_group", &self.scent_group),
            ("flower_group", &self.flower_group),
            ("story_genre", &self.story_genre),
        ];
        for (axis, value) in axes {
            if let Some(value) = value {
                browser.select_checked(axis, value)?;
            }
        }
        if let Some(keyword) = &self.keyword {
            if !is_valid_search_keyword(keyword) {
                return Err(ClientError::Internal(
                    "Keyword must be 1 to 100 characters".to_string(),
                ));
            }
        }
        browser.set_options(ListOptions {
            keyword: self.keyword.clone(),
            blooming_month: self.month,
            skip: self.skip,
            limit: self.limit,
            ..ListOptions::default()
        });
        Ok(())
    }
}

/// Output shape of a plant.
#[derive(Serialize)]
struct PlantView<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    season: &'a str,
    #[serde(rename = "flowerMeaning")]
    flower_meaning: &'a str,
}

impl<'a> From<&'a PlantSummary> for PlantView<'a> {
    fn from(plant: &'a PlantSummary) -> Self {
        Self {
            id: &plant.id,
            name: &plant.name,
            description: &plant.description,
            image_url: plant.image_url.as_deref(),
            season: &plant.season,
            flower_meaning: &plant.flower_meaning,
        }
    }
}

#[derive(Serialize)]
struct RecentView<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

impl<'a> From<&'a RecentEntry> for RecentView<'a> {
    fn from(entry: &'a RecentEntry) -> Self {
        Self {
            id: &entry.id,
            name: &entry.name,
            image_url: entry.image_url.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded from the environment");

    // --- 2. Local State ---
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store_path)?);
    let tokens = Arc::new(TokenStore::restore(storage.clone()));
    let recents = RecencyStore::new(storage);

    // --- 3. Remote API & Session ---
    let auth: Arc<dyn AuthProvider> = tokens.clone();
    let api: Arc<dyn PlantApi> = Arc::new(HttpPlantApi::new(
        config.api_base_url.clone(),
        config.request_timeout,
        auth,
    )?);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let gate = Arc::new(AuthGate::new(
        tokens.clone(),
        events_tx,
        config.error_debounce,
    ));
    let mut browser = Browser::new(api, recents, tokens, gate);

    // --- 4. Run the Command ---
    let outcome = run(cli.command, cli.json, &mut browser).await;

    // Dropping the browser closes the event channel.
    drop(browser);
    while let Some(event) = events_rx.recv().await {
        match event {
            UiEvent::Toast(message) => eprintln!("! {}", message),
            UiEvent::NavigateToLogin => eprintln!("! Run `floripedia login <token>` to sign in again"),
            UiEvent::Recognized { name } => {
                eprintln!("Recognized {}, but its details could not be loaded", name)
            }
        }
    }
    outcome
}

async fn run(command: Command, json: bool, browser: &mut Browser) -> Result<(), ClientError> {
    match command {
        Command::List(args) => {
            args.apply(browser)?;
            let page = browser.refresh().await?;
            print_plants(&page.plants, json)?;
            if !json {
                println!("{} of {} plants", page.plants.len(), page.total);
            }
        }
        Command::Count(args) => {
            args.apply(browser)?;
            println!("{}", browser.count().await?);
        }
        Command::Detail { id } => {
            let plant = browser.open_detail(&id).await?;
            print_plant(&plant, json)?;
        }
        Command::Recent => {
            let pages = browser.recent_pages();
            if json {
                let views: Vec<Vec<RecentView>> = pages
                    .iter()
                    .map(|page| page.iter().map(RecentView::from).collect())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if pages.is_empty() {
                println!("Nothing viewed yet");
            } else {
                for (i, page) in pages.iter().enumerate() {
                    println!("-- page {} --", i + 1);
                    for entry in page {
                        println!("{}\t{}", entry.id, entry.name);
                    }
                }
            }
        }
        Command::RecentClear => {
            browser.clear_recent();
            println!("Recently viewed plants cleared");
        }
        Command::Favorites(args) => {
            args.apply(browser)?;
            let plants = browser.favorites().await?;
            print_plants(&plants, json)?;
        }
        Command::Favorite { id } => {
            let now_favorite = browser.toggle_favorite(&id).await?;
            if now_favorite {
                println!("Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }
        Command::Recommend { situation } => {
            let plant = browser.recommend(&situation).await?;
            print_plant(&plant, json)?;
        }
        Command::SearchImage { path } => {
            let image = tokio::fs::read(&path).await?;
            if !is_valid_image_format(&image) {
                return Err(ClientError::Internal(format!(
                    "{} is not a JPEG or PNG image",
                    path.display()
                )));
            }
            let plant = browser.search_by_image(&image).await?;
            print_plant(&plant, json)?;
        }
        Command::Login { token } => {
            browser.login(Token::new(token.trim())).await;
            println!("Logged in");
        }
        Command::Logout => {
            browser.logout().await;
            println!("Logged out");
        }
    }
    Ok(())
}

fn print_plants(plants: &[PlantSummary], json: bool) -> Result<(), ClientError> {
    if json {
        let views: Vec<PlantView> = plants.iter().map(PlantView::from).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        for plant in plants {
            println!("{}\t{}\t{}", plant.id, plant.name, plant.season);
        }
    }
    Ok(())
}

fn print_plant(plant: &PlantSummary, json: bool) -> Result<(), ClientError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&PlantView::from(plant))?);
    } else {
        println!("{} ({})", plant.name, plant.id);
        if !plant.description.is_empty() {
            println!("{}", plant.description);
        }
        if !plant.flower_meaning.is_empty() {
            println!("Meaning: {}", plant.flower_meaning);
        }
        if let Some(url) = &plant.image_url {
            println!("Image: {}", url);
        }
    }
    Ok(())
}
