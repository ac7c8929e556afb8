//! HTTP API handlers for notekeep

pub mod health;
pub mod phrases;
pub mod ui;

pub use health::health_routes;
pub use phrases::phrase_routes;
pub use ui::ui_routes;
