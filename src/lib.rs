//! # airport_explorer
//!
//! `airport_explorer` is the query and aggregation core of an airport
//! exploration dashboard. It loads one airport CSV (OurAirports layout) into
//! a read-only columnar table and answers the dashboard's questions about it:
//!
//! - Memory-mapped CSV loading, dropping rows without coordinates
//! - Derived `name_length` and `high_altitude` columns
//! - Composable filters by region, city and scheduled service
//! - Distinct values, frequency tables, shares, top-N and pivot tables
//! - Map feeds: points with tooltips and a default viewport
//! - An LRU cache of filter results for repeated UI queries
//! - Optional Python bindings (`python-bindings` feature)
//!
//! # Example
//!
//! ```no_run
//! use airport_explorer::dataset::{AirportDataset, AirportField, SortDirection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = AirportDataset::load("data/new_england_airports.csv")?;
//!
//!     // Default region, then an explicit one
//!     let ct = dataset.region_summary(None);
//!     let ma = dataset.region_summary(Some("US-MA"));
//!     println!("CT {:?}, MA {:?}", ct, ma);
//!
//!     // Scheduled airports in one city
//!     let boston = dataset
//!         .filter_by_region_and_city("US-MA", "Boston")
//!         .filter_scheduled_service();
//!     println!("{} scheduled airports in Boston", boston.len());
//!
//!     let highest = dataset.top_n_by(AirportField::ElevationFt, 10, SortDirection::Descending);
//!     for airport in highest {
//!         println!("{} {:?}", airport.name, airport.elevation_ft);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;

#[cfg(feature = "python-bindings")]
pub mod python;
