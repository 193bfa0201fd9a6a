//! Data layer of a property marketplace: the listing store, the catalog
//! search engine, provider moderation and activity feeds.

pub mod activity;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod repository;
pub mod store;

pub use catalog::{search, FilterSpec, SortBy, SortOrder};
pub use error::{ActionOutcome, CatalogError};
pub use models::{Property, Role, Session};
pub use store::{ListingUpdate, NewListing, PropertyStore};
