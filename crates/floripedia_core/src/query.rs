//! crates/floripedia_core/src/query.rs
//!
//! Outbound query parameters for the plant list endpoints.

use crate::filter::FilterAxis;

pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_SORT_BY: &str = "name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Everything a list request carries besides the filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub keyword: Option<String>,
    /// 1 to 12.
    pub blooming_month: Option<u8>,
    pub skip: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            keyword: None,
            blooming_month: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

/// Named query fields understood by the plant API.
///
/// Fields left as `None` are omitted from the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub season: Option<String>,
    pub category_group: Option<String>,
    pub color_group: Option<String>,
    pub scent_group: Option<String>,
    pub flower_group: Option<String>,
    pub story_genre: Option<String>,
    pub keyword: Option<String>,
    pub blooming_month: Option<u8>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl QueryParams {
    pub fn axis(&self, axis: FilterAxis) -> Option<&str> {
        let slot = match axis {
            FilterAxis::Season => &self.season,
            FilterAxis::CategoryGroup => &self.category_group,
            FilterAxis::ColorGroup => &self.color_group,
            FilterAxis::ScentGroup => &self.scent_group,
            FilterAxis::FlowerGroup => &self.flower_group,
            FilterAxis::StoryGenre => &self.story_genre,
        };
        slot.as_deref()
    }

    pub(crate) fn set_axis(&mut self, axis: FilterAxis, value: String) {
        let slot = match axis {
            FilterAxis::Season => &mut self.season,
            FilterAxis::CategoryGroup => &mut self.category_group,
            FilterAxis::ColorGroup => &mut self.color_group,
            FilterAxis::ScentGroup => &mut self.scent_group,
            FilterAxis::FlowerGroup => &mut self.flower_group,
            FilterAxis::StoryGenre => &mut self.story_genre,
        };
        *slot = Some(value);
    }

    /// Adds keyword, blooming month, paging and sorting to a filter-derived query.
    pub fn with_options(mut self, options: &ListOptions) -> Self {
        self = self.with_search(options.keyword.as_deref(), options.blooming_month);
        self.skip = Some(options.skip);
        self.limit = Some(options.limit);
        self.sort_by = Some(options.sort_by.clone());
        self.sort_order = Some(options.sort_order);
        self
    }

    /// Adds only the search terms; used by the count endpoint, which takes no paging.
    pub fn with_search(mut self, keyword: Option<&str>, blooming_month: Option<u8>) -> Self {
        self.keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        self.blooming_month = blooming_month;
        self
    }

    /// The favorites endpoint only filters by season, category group and color group.
    pub fn for_favorites(self) -> Self {
        Self {
            season: self.season,
            category_group: self.category_group,
            color_group: self.color_group,
            skip: self.skip,
            limit: self.limit,
            ..Self::default()
        }
    }

    /// Wire-level `(name, value)` pairs, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for axis in FilterAxis::ALL {
            if let Some(value) = self.axis(axis) {
                pairs.push((axis.wire_name(), value.to_string()));
            }
        }
        if let Some(month) = self.blooming_month {
            pairs.push(("blooming_month", month.to_string()));
        }
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sort_order", order.as_str().to_string()));
        }
        pairs
    }
}
