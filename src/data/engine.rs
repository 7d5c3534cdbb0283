use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::filter::{FilterSpec, filtered_indices};
use super::histogram::Histogram;
use super::model::{MapView, Restaurant, RestaurantDataset};

pub const DEFAULT_TOP_N: usize = 100;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Knobs that shape the derived views, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            top_n: DEFAULT_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Values still selectable in the dependent selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionSets {
    pub areas: Vec<String>,
    pub food_types: Vec<String>,
}

/// Distinct counts shown on the KPI cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub cities: usize,
    pub areas: usize,
    pub restaurants: usize,
    pub food_types: usize,
}

/// Per-city rollup used when the source has no coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStats {
    pub city: String,
    pub mean_rating: f64,
    pub restaurants: usize,
    /// Mean over listings that have a price.
    pub mean_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MapData {
    Geo(Vec<GeoPoint>),
    CityRollup(Vec<CityStats>),
}

impl Default for MapData {
    fn default() -> Self {
        MapData::CityRollup(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distributions {
    pub rating: Histogram,
    pub price: Histogram,
    pub delivery_time: Histogram,
    /// `(food_type, listings)`, most frequent first.
    pub food_share: Vec<(String, usize)>,
}

/// Everything the presentation layer needs for one filter state.
///
/// `subset` and `top` index into the dataset's records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineResult {
    pub subset: Vec<usize>,
    pub options: OptionSets,
    pub kpis: Kpis,
    pub map: MapData,
    pub distributions: Distributions,
    pub top: Vec<usize>,
}

impl EngineResult {
    /// No listing satisfied the filters. A normal state, not an error.
    pub fn is_empty(&self) -> bool {
        self.subset.is_empty()
    }

    /// Top-N listings, best rated first.
    pub fn top_records<'a>(
        &'a self,
        dataset: &'a RestaurantDataset,
    ) -> impl Iterator<Item = &'a Restaurant> + 'a {
        self.top.iter().map(move |&i| &dataset.records[i])
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Filter the dataset and derive every view from the surviving listings.
///
/// Pure: the dataset is only read, and identical inputs give identical output.
pub fn evaluate(
    dataset: &RestaurantDataset,
    filters: &FilterSpec,
    options: &EngineOptions,
) -> EngineResult {
    let subset = filtered_indices(dataset, filters);
    log::debug!(
        "evaluate: {} of {} listings pass {:?}",
        subset.len(),
        dataset.len(),
        filters
    );
    if subset.is_empty() {
        return EngineResult::default();
    }

    let rows: Vec<&Restaurant> = subset.iter().map(|&i| &dataset.records[i]).collect();

    let map = match dataset.schema.map_view {
        MapView::Geo => MapData::Geo(geo_points(dataset, &subset)),
        MapView::CityRollup => MapData::CityRollup(city_rollup(&rows)),
    };

    EngineResult {
        options: OptionSets {
            areas: distinct(&rows, |r| &r.area).into_iter().map(str::to_string).collect(),
            food_types: distinct(&rows, |r| &r.food_type)
                .into_iter()
                .map(str::to_string)
                .collect(),
        },
        kpis: Kpis {
            cities: distinct(&rows, |r| &r.city).len(),
            areas: distinct(&rows, |r| &r.area).len(),
            restaurants: distinct(&rows, |r| &r.restaurant).len(),
            food_types: distinct(&rows, |r| &r.food_type).len(),
        },
        map,
        distributions: distributions(&rows, options.histogram_bins),
        top: top_n(dataset, &subset, options.top_n),
        subset,
    }
}

/// Sorted distinct non-empty values of one categorical field.
fn distinct<'a, F>(rows: &[&'a Restaurant], field: F) -> BTreeSet<&'a str>
where
    F: Fn(&'a Restaurant) -> &'a String,
{
    rows.iter()
        .map(|&r| field(r).as_str())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Indices sorted by rating descending, ties kept in dataset order, truncated.
fn top_n(dataset: &RestaurantDataset, subset: &[usize], limit: usize) -> Vec<usize> {
    let mut ranked = subset.to_vec();
    // `sort_by` is stable.
    ranked.sort_by(|&a, &b| {
        dataset.records[b]
            .avg_ratings
            .total_cmp(&dataset.records[a].avg_ratings)
    });
    ranked.truncate(limit);
    ranked
}

fn geo_points(dataset: &RestaurantDataset, subset: &[usize]) -> Vec<GeoPoint> {
    subset
        .iter()
        .filter_map(|&index| {
            let record = &dataset.records[index];
            let (latitude, longitude) = record.position()?;
            Some(GeoPoint {
                index,
                latitude,
                longitude,
                rating: record.avg_ratings,
                price: record.price,
            })
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

#[derive(Default)]
struct CityAccumulator<'a> {
    ratings: Vec<f64>,
    prices: Vec<f64>,
    restaurants: BTreeSet<&'a str>,
}

fn city_rollup(rows: &[&Restaurant]) -> Vec<CityStats> {
    let mut groups: BTreeMap<&str, CityAccumulator> = BTreeMap::new();
    for r in rows.iter().filter(|r| !r.city.is_empty()) {
        let acc = groups.entry(r.city.as_str()).or_default();
        acc.ratings.push(r.avg_ratings);
        acc.prices.extend(r.price);
        if !r.restaurant.is_empty() {
            acc.restaurants.insert(r.restaurant.as_str());
        }
    }

    groups
        .into_iter()
        .map(|(city, acc)| CityStats {
            city: city.to_string(),
            mean_rating: mean(&acc.ratings).unwrap_or_default(),
            restaurants: acc.restaurants.len(),
            mean_price: mean(&acc.prices),
        })
        .collect()
}

fn distributions(rows: &[&Restaurant], bins: usize) -> Distributions {
    let ratings: Vec<f64> = rows.iter().map(|r| r.avg_ratings).collect();
    let prices: Vec<f64> = rows.iter().filter_map(|r| r.price).collect();
    let delivery: Vec<f64> = rows.iter().filter_map(|r| r.delivery_time).collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in rows.iter().filter(|r| !r.food_type.is_empty()) {
        *counts.entry(r.food_type.as_str()).or_default() += 1;
    }
    let mut food_share: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(food, n)| (food.to_string(), n))
        .collect();
    // Stable over the name-sorted map: equal counts stay alphabetical.
    food_share.sort_by(|a, b| b.1.cmp(&a.1));

    Distributions {
        rating: Histogram::build(&ratings, bins),
        price: Histogram::build(&prices, bins),
        delivery_time: Histogram::build(&delivery, bins),
        food_share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::{Bounds, SchemaInfo};

    fn rollup_dataset(records: Vec<Restaurant>) -> RestaurantDataset {
        RestaurantDataset::from_records(records, SchemaInfo::new(Vec::new()))
    }

    #[test]
    fn city_scenario() {
        let ds = rollup_dataset(vec![
            listing("A", "North", "First", 4.5),
            listing("B", "South", "Second", 3.0),
            listing("A", "East", "Third", 4.9),
        ]);
        let spec = FilterSpec {
            city: Some("A".into()),
            ..Default::default()
        };
        let result = evaluate(&ds, &spec, &EngineOptions::default());

        assert_eq!(result.subset, vec![0, 2]);
        assert_eq!(result.kpis.restaurants, 2);
        assert_eq!(result.kpis.cities, 1);
        assert_eq!(result.options.areas, vec!["East", "North"]);
        assert_eq!(result.top, vec![2, 0]);
    }

    #[test]
    fn ties_keep_original_order() {
        let ds = rollup_dataset(vec![
            listing("A", "x", "r0", 4.1),
            listing("A", "x", "r1", 4.8),
            listing("A", "x", "r2", 4.8),
            listing("A", "x", "r3", 3.9),
        ]);
        let result = evaluate(&ds, &FilterSpec::default(), &EngineOptions::default());
        assert_eq!(result.top, vec![1, 2, 0, 3]);
    }

    #[test]
    fn top_n_is_truncated() {
        let records = (0..150)
            .map(|i| listing("A", "x", &format!("r{i}"), (i % 50) as f64 / 10.0))
            .collect();
        let ds = rollup_dataset(records);
        let result = evaluate(&ds, &FilterSpec::default(), &EngineOptions::default());
        assert_eq!(result.top.len(), DEFAULT_TOP_N);
        assert_eq!(result.subset.len(), 150);

        let small = EngineOptions {
            top_n: 5,
            ..Default::default()
        };
        assert_eq!(evaluate(&ds, &FilterSpec::default(), &small).top.len(), 5);
    }

    #[test]
    fn empty_subset_is_a_default_result() {
        let ds = rollup_dataset(vec![listing("A", "x", "r", 4.0)]);
        let spec = FilterSpec {
            rating_range: Some(Bounds::new(4.5, 5.0)),
            ..Default::default()
        };
        let result = evaluate(&ds, &spec, &EngineOptions::default());
        assert!(result.is_empty());
        assert_eq!(result, EngineResult::default());
        assert!(result.options.areas.is_empty());
        assert!(result.top.is_empty());
    }

    #[test]
    fn city_rollup_averages_and_skips_missing_prices() {
        let mut unpriced = listing("A", "x", "Dhaba", 5.0);
        unpriced.price = None;
        let ds = rollup_dataset(vec![
            listing("A", "x", "Dhaba", 4.0),
            unpriced,
            listing("B", "y", "Cafe", 3.0),
        ]);
        let result = evaluate(&ds, &FilterSpec::default(), &EngineOptions::default());
        let MapData::CityRollup(rows) = result.map else {
            panic!("expected city rollup");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].city, "A");
        assert_eq!(rows[0].mean_rating, 4.5);
        assert_eq!(rows[0].restaurants, 1);
        assert_eq!(rows[0].mean_price, Some(200.0));
        assert_eq!(rows[1].city, "B");
    }

    #[test]
    fn geo_schema_yields_points() {
        let mut placed = listing("A", "x", "Placed", 4.0);
        placed.latitude = Some(12.9);
        placed.longitude = Some(77.6);
        let ds = RestaurantDataset::from_records(
            vec![placed, listing("A", "x", "Unplaced", 3.0)],
            SchemaInfo::new(vec!["latitude".into(), "longitude".into()]),
        );
        let result = evaluate(&ds, &FilterSpec::default(), &EngineOptions::default());
        let MapData::Geo(points) = result.map else {
            panic!("expected geo points");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].index, 0);
        assert_eq!(points[0].latitude, 12.9);
    }

    #[test]
    fn food_share_orders_by_count_then_name() {
        let mut records = vec![listing("A", "x", "r0", 4.0), listing("A", "x", "r1", 4.0)];
        for (i, food) in ["Thai", "Chinese", "Chinese"].iter().enumerate() {
            let mut r = listing("A", "x", &format!("f{i}"), 4.0);
            r.food_type = food.to_string();
            records.push(r);
        }
        let ds = rollup_dataset(records);
        let result = evaluate(&ds, &FilterSpec::default(), &EngineOptions::default());
        assert_eq!(
            result.distributions.food_share,
            vec![
                ("Chinese".to_string(), 2),
                ("Indian".to_string(), 2),
                ("Thai".to_string(), 1)
            ]
        );
        assert_eq!(result.distributions.rating.total(), 5);
    }
}
