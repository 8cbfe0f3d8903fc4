//! Client-side tables
//!
//! A [`TableView`] owns an in-memory collection and the interactive
//! [`ViewState`] of one table. Every transition re-runs the [`engine`]
//! (status filter, search, sort, page slice) and [`TableView::render`]
//! turns the result into a presentation model.

mod config;
pub mod engine;
mod render;
mod state;
mod view;

pub use config::*;
pub use engine::Projection;
pub use render::*;
pub use state::*;
pub use view::*;
