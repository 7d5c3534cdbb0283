use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use delivery_dashboard::app::DashboardApp;
use delivery_dashboard::config::{Cli, DashboardConfig, RunMode};
use delivery_dashboard::data::engine::evaluate;
use delivery_dashboard::data::loader::load_file;
use delivery_dashboard::data::model::RestaurantDataset;
use delivery_dashboard::state::AppState;
use delivery_dashboard::summary::Summary;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::try_from(Cli::parse())?;

    // A file named on the command line must load, or we do not start at all.
    let dataset = match &config.data_path {
        Some(path) => Some(Arc::new(
            load_file(path).with_context(|| format!("loading {}", path.display()))?,
        )),
        None => None,
    };

    match (config.mode, dataset) {
        (RunMode::Headless(filters), Some(dataset)) => {
            let result = evaluate(&dataset, &filters, &config.engine);
            println!("{}", Summary::new(&dataset, &filters, &result).to_json()?);
            Ok(())
        }
        (_, dataset) => run_gui(AppState::new(config.engine), dataset),
    }
}

fn run_gui(mut state: AppState, dataset: Option<Arc<RestaurantDataset>>) -> Result<()> {
    if let Some(dataset) = dataset {
        state.set_dataset(dataset);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Restaurant Delivery Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
