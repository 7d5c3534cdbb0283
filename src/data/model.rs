use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Bounds – a closed numeric interval
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]` used for rating / price ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    /// Inclusive on both ends. A reversed interval contains nothing.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Min/max over an iterator of values, `None` when it is empty.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Bounds::new(v, v)),
            Some(b) => Some(Bounds::new(b.min.min(v), b.max.max(v))),
        })
    }
}

// ---------------------------------------------------------------------------
// Restaurant – one row of the source table
// ---------------------------------------------------------------------------

/// A single restaurant listing after normalization.
///
/// Categorical fields use an empty string for a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub city: String,
    pub area: String,
    pub restaurant: String,
    pub food_type: String,
    pub price: Option<f64>,
    /// Always present: rows without a rating are dropped at load time.
    pub avg_ratings: f64,
    /// Minutes, extracted from free text such as `"35 mins"`.
    pub delivery_time: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Restaurant {
    /// Both coordinates, when the row has them.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

// ---------------------------------------------------------------------------
// Schema descriptor
// ---------------------------------------------------------------------------

/// How the map view is rendered, decided once from the source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MapView {
    /// Source has `latitude` and `longitude`: scatter on coordinates.
    Geo,
    /// No coordinates: per-city rollup instead.
    CityRollup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInfo {
    /// Normalized source column names, in source order.
    pub columns: Vec<String>,
    pub map_view: MapView,
}

impl SchemaInfo {
    pub fn new(columns: Vec<String>) -> Self {
        let has = |name: &str| columns.iter().any(|c| c == name);
        let map_view = if has("latitude") && has("longitude") {
            MapView::Geo
        } else {
            MapView::CityRollup
        };
        SchemaInfo { columns, map_view }
    }

    pub fn has_geo(&self) -> bool {
        self.map_view == MapView::Geo
    }
}

// ---------------------------------------------------------------------------
// RestaurantDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed global bounds.
///
/// Built once and never mutated; views over it are index lists.
#[derive(Debug, Clone)]
pub struct RestaurantDataset {
    pub records: Vec<Restaurant>,
    pub schema: SchemaInfo,
    /// Sorted distinct non-empty cities, for the top-level selector.
    pub cities: Vec<String>,
    /// `None` only for an empty dataset.
    pub rating_bounds: Option<Bounds>,
    /// `None` when no row carries a price.
    pub price_bounds: Option<Bounds>,
}

impl RestaurantDataset {
    /// Build derived indices from the normalized records.
    pub fn from_records(records: Vec<Restaurant>, schema: SchemaInfo) -> Self {
        let cities: BTreeSet<&str> = records
            .iter()
            .map(|r| r.city.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        let cities = cities.into_iter().map(str::to_string).collect();
        let rating_bounds = Bounds::of(records.iter().map(|r| r.avg_ratings));
        let price_bounds = Bounds::of(records.iter().filter_map(|r| r.price));

        RestaurantDataset {
            records,
            schema,
            cities,
            rating_bounds,
            price_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn listing(city: &str, area: &str, name: &str, rating: f64) -> Restaurant {
        Restaurant {
            city: city.to_string(),
            area: area.to_string(),
            restaurant: name.to_string(),
            food_type: "Indian".to_string(),
            price: Some(200.0),
            avg_ratings: rating,
            delivery_time: Some(30.0),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn bounds_are_closed() {
        let b = Bounds::new(3.0, 4.5);
        assert!(b.contains(3.0));
        assert!(b.contains(4.5));
        assert!(!b.contains(4.6));
        assert!(!Bounds::new(5.0, 1.0).contains(3.0));
    }

    #[test]
    fn geo_capability_needs_both_columns() {
        let cols = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(SchemaInfo::new(cols(&["city", "latitude"])).map_view, MapView::CityRollup);
        assert!(SchemaInfo::new(cols(&["longitude", "city", "latitude"])).has_geo());
    }

    #[test]
    fn dataset_derives_cities_and_bounds() {
        let mut no_price = listing("Pune", "Baner", "C", 4.9);
        no_price.price = None;
        let records = vec![
            listing("Delhi", "Saket", "A", 3.1),
            listing("", "Saket", "B", 4.0),
            no_price,
            listing("Delhi", "Dwarka", "D", 3.8),
        ];
        let ds = RestaurantDataset::from_records(records, SchemaInfo::new(Vec::new()));

        assert_eq!(ds.cities, vec!["Delhi", "Pune"]);
        assert_eq!(ds.rating_bounds, Some(Bounds::new(3.1, 4.9)));
        assert_eq!(ds.price_bounds, Some(Bounds::new(200.0, 200.0)));
        assert_eq!(ds.len(), 4);
    }
}
