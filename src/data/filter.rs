use serde::Serialize;

use super::model::{Bounds, Restaurant, RestaurantDataset};

// ---------------------------------------------------------------------------
// Filter predicate: the current selector / slider state
// ---------------------------------------------------------------------------

/// Current user selection. An absent field (or an empty category string)
/// means "no restriction" on that dimension, never "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    pub city: Option<String>,
    pub area: Option<String>,
    pub food_type: Option<String>,
    pub rating_range: Option<Bounds>,
    pub price_range: Option<Bounds>,
}

impl FilterSpec {
    /// Initial selection for the UI: no category chosen, sliders spanning the
    /// dataset's global bounds.
    ///
    /// As with any active price range, listings without a price are hidden.
    pub fn full_range(dataset: &RestaurantDataset) -> Self {
        FilterSpec {
            rating_range: dataset.rating_bounds,
            price_range: dataset.price_bounds,
            ..Default::default()
        }
    }

    /// Whether a single listing passes every active predicate.
    pub fn matches(&self, record: &Restaurant) -> bool {
        category_matches(&self.city, &record.city)
            && category_matches(&self.area, &record.area)
            && category_matches(&self.food_type, &record.food_type)
            && self
                .rating_range
                .map_or(true, |range| range.contains(record.avg_ratings))
            && match self.price_range {
                None => true,
                // A missing price cannot satisfy a numeric bound.
                Some(range) => record.price.is_some_and(|p| range.contains(p)),
            }
    }
}

fn category_matches(selected: &Option<String>, value: &str) -> bool {
    match selected.as_deref() {
        None | Some("") => true,
        Some(s) => !value.is_empty() && s == value,
    }
}

/// Return indices of listings that pass all active filters, in dataset order.
pub fn filtered_indices(dataset: &RestaurantDataset, filters: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.matches(r))
        .map(|(i, _)| i)
        .collect()
}
