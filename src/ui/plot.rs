use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::rating_color;
use crate::data::engine::{CityStats, GeoPoint, MapData};
use crate::data::histogram::Histogram;
use crate::data::model::Bounds;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const MAP_HEIGHT: f32 = 420.0;
const RATING_BUCKETS: usize = 10;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render the map, the three histograms and the food-type share.
pub fn dashboard_charts(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        return;
    }
    if state.result.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data for selected filters");
        });
        return;
    }

    match &state.result.map {
        MapData::Geo(points) => {
            ui.heading("Restaurant Locations (Filtered View)");
            geo_plot(ui, points);
        }
        MapData::CityRollup(rows) => {
            ui.heading("City-wise Ratings & Restaurant Count (No Geo Columns)");
            city_rollup_plot(ui, rows);
        }
    }

    let dist = &state.result.distributions;
    ui.columns(2, |cols| {
        cols[0].strong("Rating Distribution");
        histogram_plot(&mut cols[0], "rating_chart", &dist.rating, "Rating", Color32::GOLD);
        cols[1].strong("Price Distribution");
        histogram_plot(&mut cols[1], "price_chart", &dist.price, "Price", Color32::LIGHT_GREEN);
    });
    ui.columns(2, |cols| {
        cols[0].strong("Delivery Time Distribution (mins)");
        histogram_plot(
            &mut cols[0],
            "delivery_chart",
            &dist.delivery_time,
            "Minutes",
            Color32::LIGHT_BLUE,
        );
        cols[1].strong("Food Type Share (Filtered)");
        food_share_plot(&mut cols[1], &dist.food_share, state);
    });
}

fn histogram_plot(ui: &mut Ui, id: &str, histogram: &Histogram, x_label: &str, color: Color32) {
    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|bin| Bar::new(bin.center(), bin.count as f64).width(bin.width()))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

fn food_share_plot(ui: &mut Ui, share: &[(String, usize)], state: &AppState) {
    let total: usize = share.iter().map(|(_, n)| n).sum();

    Plot::new("foodtype_share")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Share (%)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (food, count)) in share.iter().enumerate() {
                let percent = *count as f64 * 100.0 / total.max(1) as f64;
                let color = state.palette.color_for(food);
                let bar = Bar::new(i as f64, percent).width(0.8).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(food));
            }
        });
}

fn city_rollup_plot(ui: &mut Ui, rows: &[CityStats]) {
    Plot::new("map_chart")
        .height(MAP_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Average rating")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, row) in rows.iter().enumerate() {
                let price = row
                    .mean_price
                    .map(|p| format!("{p:.0}"))
                    .unwrap_or_else(|| "n/a".to_string());
                let name = format!(
                    "{} ({} restaurants, avg price {price})",
                    row.city, row.restaurants
                );
                let points: PlotPoints = vec![[i as f64, row.mean_rating]].into();
                plot_ui.points(
                    Points::new(points)
                        .radius(4.0 + (row.restaurants as f32).sqrt() * 2.0)
                        .name(name),
                );
            }
        });
}

fn geo_plot(ui: &mut Ui, points: &[GeoPoint]) {
    let Some(bounds) = Bounds::of(points.iter().map(|p| p.rating)) else {
        ui.label("No listings with coordinates");
        return;
    };
    let span = (bounds.max - bounds.min).max(f64::EPSILON);

    // One series per rating bucket so each gets its own colour.
    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); RATING_BUCKETS];
    for p in points {
        let slot = (((p.rating - bounds.min) / span) * RATING_BUCKETS as f64) as usize;
        buckets[slot.min(RATING_BUCKETS - 1)].push([p.longitude, p.latitude]);
    }

    Plot::new("map_chart")
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            for (i, coords) in buckets.into_iter().enumerate() {
                if coords.is_empty() {
                    continue;
                }
                let rating = bounds.min + (i as f64 + 0.5) * span / RATING_BUCKETS as f64;
                let points: PlotPoints = coords.into();
                plot_ui.points(
                    Points::new(points)
                        .radius(3.0)
                        .color(rating_color(rating, bounds)),
                );
            }
        });
}
