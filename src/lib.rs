//! Storewise: an interactive dashboard for segment classification and sales
//! regression over a Superstore-style dataset.
//!
//! The pipeline is load → enrich → select → predict → export; the models
//! are pretrained artifacts loaded from disk (no training happens here).

pub mod app;
pub mod cache;
pub mod color;
pub mod data;
pub mod predict;
pub mod state;
pub mod ui;
