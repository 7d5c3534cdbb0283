use std::sync::Arc;

use crate::color::FoodPalette;
use crate::data::engine::{EngineOptions, EngineResult, evaluate};
use crate::data::filter::FilterSpec;
use crate::data::model::{Bounds, RestaurantDataset};

/// Rows per page of the top restaurants table.
pub const TABLE_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Shared and read-only.
    pub dataset: Option<Arc<RestaurantDataset>>,

    /// Current selector / slider values.
    pub filters: FilterSpec,

    /// Engine output for `filters` (cached until the next change).
    pub result: EngineResult,

    pub engine: EngineOptions,

    /// Colours for food types, built once per dataset.
    pub palette: FoodPalette,

    /// Zero-based page of the top restaurants table.
    pub table_page: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(engine: EngineOptions) -> Self {
        Self {
            dataset: None,
            filters: FilterSpec::default(),
            result: EngineResult::default(),
            engine,
            palette: FoodPalette::default(),
            table_page: 0,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset filters to the full range.
    pub fn set_dataset(&mut self, dataset: Arc<RestaurantDataset>) {
        self.filters = FilterSpec::full_range(&dataset);
        self.palette = FoodPalette::new(dataset.records.iter().map(|r| r.food_type.as_str()));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Re-run the engine after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.result = evaluate(ds, &self.filters, &self.engine);
        }
        self.table_page = 0;
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.filters.city = city;
        self.refilter();
    }

    pub fn set_area(&mut self, area: Option<String>) {
        self.filters.area = area;
        self.refilter();
    }

    pub fn set_food_type(&mut self, food_type: Option<String>) {
        self.filters.food_type = food_type;
        self.refilter();
    }

    pub fn set_rating_range(&mut self, range: Bounds) {
        self.filters.rating_range = Some(range);
        self.refilter();
    }

    pub fn set_price_range(&mut self, range: Bounds) {
        self.filters.price_range = Some(range);
        self.refilter();
    }

    /// Back to the state right after loading.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = FilterSpec::full_range(ds);
            self.refilter();
        }
    }

    pub fn page_count(&self) -> usize {
        self.result.top.len().div_ceil(TABLE_PAGE_SIZE)
    }

    /// Indices shown on the current table page.
    pub fn page_rows(&self) -> &[usize] {
        let start = (self.table_page * TABLE_PAGE_SIZE).min(self.result.top.len());
        let end = (start + TABLE_PAGE_SIZE).min(self.result.top.len());
        &self.result.top[start..end]
    }

    pub fn next_page(&mut self) {
        if self.table_page + 1 < self.page_count() {
            self.table_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.table_page = self.table_page.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SchemaInfo;
    use crate::data::model::tests::listing;

    fn state_with(n: usize) -> AppState {
        let records = (0..n)
            .map(|i| listing(if i % 2 == 0 { "A" } else { "B" }, "x", &format!("r{i}"), 4.0))
            .collect();
        let ds = RestaurantDataset::from_records(records, SchemaInfo::new(Vec::new()));
        let mut state = AppState::new(EngineOptions::default());
        state.set_dataset(Arc::new(ds));
        state
    }

    #[test]
    fn loading_evaluates_full_range() {
        let state = state_with(25);
        assert_eq!(state.result.subset.len(), 25);
        assert_eq!(state.page_count(), 3);
        assert_eq!(state.page_rows().len(), 10);
    }

    #[test]
    fn paging_is_clamped_and_reset_by_filters() {
        let mut state = state_with(25);
        for _ in 0..5 {
            state.next_page();
        }
        assert_eq!(state.table_page, 2);
        assert_eq!(state.page_rows().len(), 5);

        state.set_city(Some("A".into()));
        assert_eq!(state.table_page, 0);
        assert_eq!(state.result.subset.len(), 13);

        state.prev_page();
        assert_eq!(state.table_page, 0);
    }

    #[test]
    fn reset_restores_full_range() {
        let mut state = state_with(4);
        state.set_rating_range(Bounds::new(4.5, 5.0));
        assert!(state.result.is_empty());
        state.reset_filters();
        assert_eq!(state.result.subset.len(), 4);
        assert_eq!(state.filters.city, None);
    }
}
