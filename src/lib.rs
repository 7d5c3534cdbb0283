//! Restaurant-delivery analytics: load a listings file once, then filter and
//! aggregate it for an egui dashboard or a one-shot JSON summary.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod summary;
pub mod ui;
