use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 7] = [
    "Restaurant",
    "City",
    "Area",
    "Food Type",
    "Price",
    "Rating",
    "Delivery Time (mins)",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.0}")).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Top restaurants table (paged)
// ---------------------------------------------------------------------------

pub fn top_restaurants(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };

    ui.heading("Top Restaurants (Filtered View)");
    if state.result.top.is_empty() {
        ui.label("No data for selected filters");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("◀").clicked() {
            state.prev_page();
        }
        ui.label(format!("page {} / {}", state.table_page + 1, state.page_count()));
        if ui.button("▶").clicked() {
            state.next_page();
        }
    });

    let rows = state.page_rows();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &dataset.records[rows[row.index()]];
                let cells = [
                    r.restaurant.clone(),
                    r.city.clone(),
                    r.area.clone(),
                    r.food_type.clone(),
                    optional(r.price),
                    format!("{:.1}", r.avg_ratings),
                    optional(r.delivery_time),
                ];
                for text in cells {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
