use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Bounds;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Dropdown with an "(all)" entry. Returns the new selection when it changed.
fn selector(
    ui: &mut Ui,
    id: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<Option<String>> {
    let mut changed = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or("(all)"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "(all)").clicked() {
                changed = Some(None);
            }
            for opt in options {
                if ui
                    .selectable_label(current == Some(opt.as_str()), opt)
                    .clicked()
                {
                    changed = Some(Some(opt.clone()));
                }
            }
        });
    changed
}

/// Two sliders bounding a closed interval. Returns the new range when moved.
fn range_sliders(ui: &mut Ui, current: Bounds, limits: Bounds, step: f64) -> Option<Bounds> {
    let mut lo = current.min;
    let mut hi = current.max;
    let moved_lo = ui
        .add(egui::Slider::new(&mut lo, limits.min..=limits.max).text("min").step_by(step))
        .changed();
    let moved_hi = ui
        .add(egui::Slider::new(&mut hi, limits.min..=limits.max).text("max").step_by(step))
        .changed();
    (moved_lo || moved_hi).then(|| Bounds::new(lo, hi))
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Option lists come from the last evaluation; clone so the state can change below.
    let areas = state.result.options.areas.clone();
    let food_types = state.result.options.food_types.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Select City");
            if let Some(city) = selector(ui, "city_filter", state.filters.city.as_deref(), &dataset.cities) {
                state.set_city(city);
            }

            ui.strong("Select Area");
            if let Some(area) = selector(ui, "area_filter", state.filters.area.as_deref(), &areas) {
                state.set_area(area);
            }

            ui.strong("Food Type");
            if let Some(food) = selector(ui, "food_filter", state.filters.food_type.as_deref(), &food_types) {
                state.set_food_type(food);
            }

            ui.separator();

            if let Some(limits) = dataset.rating_bounds {
                ui.strong("Rating Range");
                let current = state.filters.rating_range.unwrap_or(limits);
                if let Some(range) = range_sliders(ui, current, limits, 0.1) {
                    state.set_rating_range(range);
                }
            }

            if let Some(limits) = dataset.price_bounds {
                ui.strong("Price Range");
                let step = ((limits.max - limits.min) / 50.0).max(1.0);
                let current = state.filters.price_range.unwrap_or(limits);
                if let Some(range) = range_sliders(ui, current, limits, step) {
                    state.set_price_range(range);
                }
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_card(ui: &mut Ui, title: &str, value: usize, fill: Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(15))
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(title).color(Color32::BLACK));
                ui.heading(RichText::new(value.to_string()).color(Color32::BLACK).strong());
            });
        });
}

/// Distinct counts of the filtered listings.
pub fn kpi_cards(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore listings  (File → Open…)");
        });
        return;
    }

    let kpis = state.result.kpis;
    ui.columns(4, |cols| {
        kpi_card(&mut cols[0], "Cities", kpis.cities, Color32::from_rgb(0xcf, 0xe3, 0xff));
        kpi_card(&mut cols[1], "Areas", kpis.areas, Color32::from_rgb(0xff, 0xe9, 0xc7));
        kpi_card(&mut cols[2], "Restaurants", kpis.restaurants, Color32::from_rgb(0xc5, 0xff, 0xd1));
        kpi_card(&mut cols[3], "Food Types", kpis.food_types, Color32::from_rgb(0xff, 0xd0, 0xd0));
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} visible",
                ds.len(),
                state.result.subset.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(Arc::new(dataset)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
