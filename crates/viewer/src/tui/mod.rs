//! Terminal User Interface
//!
//! Interactive device tree with an endpoint detail pane.

pub mod app;
pub mod events;
pub mod ui;

pub use app::run;
