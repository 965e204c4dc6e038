//! crates/floripedia_core/src/filter.rs
//!
//! The filter selection reducer. Each axis holds at most one value; selecting
//! the current value again clears it, selecting another value replaces it.
//! The selection is a pure value: every transition returns a new one.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::query::QueryParams;

const SEASONS: &[&str] = &["SPRING", "SUMMER", "FALL", "WINTER"];
const CATEGORY_GROUPS: &[&str] = &["꽃과 풀", "나무와 조경", "실내 인테리어", "텃밭과 정원"];
const COLOR_GROUPS: &[&str] = &["백색/미색", "노랑/주황", "빨강/분홍", "푸른색", "갈색/검정"];
const SCENT_GROUPS: &[&str] = &["달콤·화사", "싱그러운·시원", "은은·차분", "무향"];
const FLOWER_GROUPS: &[&str] = &["사랑/고백", "위로/슬픔", "감사/존경", "이별/그리움", "행복/즐거움"];

/// One independent filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterAxis {
    Season,
    CategoryGroup,
    ColorGroup,
    ScentGroup,
    FlowerGroup,
    /// Open axis: any string is accepted.
    StoryGenre,
}

impl FilterAxis {
    pub const ALL: [FilterAxis; 6] = [
        FilterAxis::Season,
        FilterAxis::CategoryGroup,
        FilterAxis::ColorGroup,
        FilterAxis::ScentGroup,
        FilterAxis::FlowerGroup,
        FilterAxis::StoryGenre,
    ];

    /// Field name as exposed to callers (`categoryGroup`).
    pub fn query_name(self) -> &'static str {
        match self {
            FilterAxis::Season => "season",
            FilterAxis::CategoryGroup => "categoryGroup",
            FilterAxis::ColorGroup => "colorGroup",
            FilterAxis::ScentGroup => "scentGroup",
            FilterAxis::FlowerGroup => "flowerGroup",
            FilterAxis::StoryGenre => "storyGenre",
        }
    }

    /// Parameter name on the wire (`category_group`).
    pub fn wire_name(self) -> &'static str {
        match self {
            FilterAxis::Season => "season",
            FilterAxis::CategoryGroup => "category_group",
            FilterAxis::ColorGroup => "color_group",
            FilterAxis::ScentGroup => "scent_group",
            FilterAxis::FlowerGroup => "flower_group",
            FilterAxis::StoryGenre => "story_genre",
        }
    }

    /// The closed value set of this axis; empty for the open story-genre axis.
    pub fn valid_values(self) -> &'static [&'static str] {
        match self {
            FilterAxis::Season => SEASONS,
            FilterAxis::CategoryGroup => CATEGORY_GROUPS,
            FilterAxis::ColorGroup => COLOR_GROUPS,
            FilterAxis::ScentGroup => SCENT_GROUPS,
            FilterAxis::FlowerGroup => FLOWER_GROUPS,
            FilterAxis::StoryGenre => &[],
        }
    }

    pub fn accepts(self, value: &str) -> bool {
        match self {
            FilterAxis::StoryGenre => true,
            closed => closed.valid_values().contains(&value),
        }
    }
}

impl FromStr for FilterAxis {
    type Err = FilterError;

    /// Accepts `SEASON`-style, `categoryGroup`-style and `category_group`-style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "season" => Ok(FilterAxis::Season),
            "categorygroup" => Ok(FilterAxis::CategoryGroup),
            "colorgroup" => Ok(FilterAxis::ColorGroup),
            "scentgroup" => Ok(FilterAxis::ScentGroup),
            "flowergroup" => Ok(FilterAxis::FlowerGroup),
            "storygenre" => Ok(FilterAxis::StoryGenre),
            _ => Err(FilterError::UnknownAxis(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Unknown filter axis: {0}")]
    UnknownAxis(String),
    #[error("'{value}' is not a valid value for {axis:?}")]
    InvalidValue { axis: FilterAxis, value: String },
}

/// Checks an untrusted `(axis, value)` pair, e.g. from a deep link.
/// Unknown axes never validate.
pub fn validate(axis: &str, value: &str) -> bool {
    axis.parse::<FilterAxis>()
        .map(|axis| axis.accepts(value))
        .unwrap_or(false)
}

/// A transition of the filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Select { axis: FilterAxis, value: String },
    Reset,
}

/// At most one selected value per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<FilterAxis, String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: FilterAxis) -> Option<&str> {
        self.selected.get(&axis).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterAxis, &str)> {
        self.selected.iter().map(|(axis, value)| (*axis, value.as_str()))
    }

    /// Toggles `value` on `axis`. Other axes are left as they are.
    pub fn select(&self, axis: FilterAxis, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        if next.get(axis) == Some(value.as_str()) {
            next.selected.remove(&axis);
        } else {
            next.selected.insert(axis, value);
        }
        next
    }

    /// Like [`select`](Self::select), for input that has not been validated yet.
    pub fn select_checked(&self, axis: &str, value: &str) -> Result<Self, FilterError> {
        let axis: FilterAxis = axis.parse()?;
        if !axis.accepts(value) {
            return Err(FilterError::InvalidValue {
                axis,
                value: value.to_string(),
            });
        }
        Ok(self.select(axis, value))
    }

    pub fn reset(&self) -> Self {
        Self::default()
    }

    pub fn apply(&self, action: &FilterAction) -> Self {
        match action {
            FilterAction::Select { axis, value } => self.select(*axis, value.clone()),
            FilterAction::Reset => self.reset(),
        }
    }

    /// Maps the selection onto query fields. Unselected axes, and empty values
    /// on the open axis, are left out.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::default();
        for (axis, value) in self.iter() {
            if !value.is_empty() {
                query.set_axis(axis, value.to_string());
            }
        }
        query
    }
}

/// `(state, action) -> state`.
pub fn reduce(state: &FilterSelection, action: &FilterAction) -> FilterSelection {
    state.apply(action)
}
