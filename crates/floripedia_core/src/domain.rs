//! crates/floripedia_core/src/domain.rs
//!
//! Defines the pure, core data structures for the plant browser.
//! These structs are independent of any transport or serialization format.

/// A plant record as shown in lists, search results and recommendations.
///
/// Built only by adapters from a remote response; nothing in the core mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantSummary {
    pub id: String,
    pub name: String,
    /// One-line description (pre-content, or the recommendation text).
    pub description: String,
    pub image_url: Option<String>,
    pub season: String,
    /// The "flower language" meaning attached to the plant.
    pub flower_meaning: String,
}

/// A single "recently viewed" record, owned by the recency cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl RecentEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
            description: None,
        }
    }
}

impl From<&PlantSummary> for RecentEntry {
    fn from(plant: &PlantSummary) -> Self {
        let description = if plant.description.is_empty() {
            None
        } else {
            Some(plant.description.clone())
        };
        Self {
            id: plant.id.clone(),
            name: plant.name.clone(),
            image_url: plant.image_url.clone(),
            description,
        }
    }
}

/// An opaque bearer credential issued by the authentication provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Credentials never end up in logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_entry_from_plant_drops_empty_description() {
        let plant = PlantSummary {
            id: "p1".into(),
            name: "Rose".into(),
            description: String::new(),
            image_url: Some("http://img/rose.png".into()),
            season: "SPRING".into(),
            flower_meaning: "love".into(),
        };
        let entry = RecentEntry::from(&plant);
        assert_eq!(entry.id, "p1");
        assert_eq!(entry.image_url.as_deref(), Some("http://img/rose.png"));
        assert_eq!(entry.description, None);
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("secret-value");
        assert_eq!(format!("{:?}", token), "Token(***)");
        assert_eq!(token.as_str(), "secret-value");
    }
}
