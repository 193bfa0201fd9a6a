pub mod filter;
pub mod query;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use filter::{search, search_owned};
pub use query::QueryError;
pub use tags::{count_feature_tags, has_feature_tag, tag_matches_amenity, TagCount, FEATURE_TAGS};
pub use types::{FilterSpec, SortBy, SortOrder, TagScope};
