//! Data table library
//!
//! Filter, search, sort and paginate collections of dynamic rows, either in
//! memory through a [`table::TableView`] or against a paged backend through a
//! [`source::GridLoader`], and persist per-table state between sessions.

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod source;
pub mod store;
pub mod table;

pub use config::GridConfig;
pub use error::Error;
