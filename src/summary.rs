use serde::Serialize;

use crate::data::engine::{EngineResult, Kpis, MapData, OptionSets};
use crate::data::filter::FilterSpec;
use crate::data::model::{Restaurant, RestaurantDataset};

/// What `--headless` prints: one evaluation, without the histogram bins.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub filters: &'a FilterSpec,
    pub listings: usize,
    pub visible: usize,
    pub kpis: Kpis,
    pub options: &'a OptionSets,
    pub map: &'a MapData,
    pub top: Vec<&'a Restaurant>,
}

impl<'a> Summary<'a> {
    pub fn new(
        dataset: &'a RestaurantDataset,
        filters: &'a FilterSpec,
        result: &'a EngineResult,
    ) -> Self {
        Summary {
            filters,
            listings: dataset.len(),
            visible: result.subset.len(),
            kpis: result.kpis,
            options: &result.options,
            map: &result.map,
            top: result.top_records(dataset).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::engine::{EngineOptions, evaluate};
    use crate::data::model::SchemaInfo;
    use crate::data::model::tests::listing;

    #[test]
    fn summary_lists_top_rows_best_first() {
        let ds = RestaurantDataset::from_records(
            vec![listing("A", "x", "Low", 3.2), listing("A", "y", "High", 4.7)],
            SchemaInfo::new(Vec::new()),
        );
        let filters = FilterSpec::default();
        let result = evaluate(&ds, &filters, &EngineOptions::default());
        let json: serde_json::Value =
            serde_json::from_str(&Summary::new(&ds, &filters, &result).to_json().unwrap()).unwrap();

        assert_eq!(json["listings"], 2);
        assert_eq!(json["visible"], 2);
        assert_eq!(json["kpis"]["restaurants"], 2);
        assert_eq!(json["top"][0]["restaurant"], "High");
        assert_eq!(json["options"]["areas"][1], "y");
        assert_eq!(json["map"]["CityRollup"][0]["city"], "A");
    }
}
