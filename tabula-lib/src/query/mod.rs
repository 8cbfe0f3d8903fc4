//! Request and response shapes exchanged between a grid and its data source.
//!
//! # Types
//!
//! - [`DatasourceRequest`] - page index, page size, sort model, filter model
//! - [`DatasourceResult`] - one page of rows plus the total match count
//! - [`SortModelItem`] / [`Direction`] - the grid sort model
//! - [`FilterModel`] / [`ColumnFilter`] - the grid filter model
//!
//! [`convert_sort_model`] and [`convert_filter_model`] flatten the grid
//! models into the parameters a REST endpoint expects.

mod filter;
mod order;
mod page;

pub use filter::ColumnFilter;
pub use filter::FilterModel;
pub use filter::convert_filter_model;
pub use order::Direction;
pub use order::SortModelItem;
pub use order::convert_sort_model;
pub use page::DatasourceRequest;
pub use page::DatasourceResult;
pub use page::PageSize;
