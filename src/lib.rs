//! Filter-and-derive pipeline for restaurant market dashboards.
//!
//! Load a delimited-text restaurant dataset into an immutable [`Dataset`],
//! apply an immutable [`FilterSpec`], and hand the resulting view to the
//! aggregate helpers for metric tiles and charts. Rendering, widgets, and
//! page chrome belong to consuming front ends; nothing here draws.

/// Grouped aggregates and KPI metrics over a filtered view.
pub mod aggregate;
/// Core types, loading, filtering, and export.
pub mod data;
/// Dashboard data state: dataset + filter + cached view.
pub mod state;

pub use data::export::write_csv;
pub use data::filter::{filtered_indices, sort_by_rating_desc, DeliveryFilter, FilterSpec};
pub use data::loader::load_file;
pub use data::model::{Dataset, FieldValue, Record, RatingCategory};
pub use data::schema::{resolve_name_column, Schema, SchemaError};
pub use state::DashboardState;
