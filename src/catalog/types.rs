use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{Category, PropertyType, UnknownVariant};

/// Search parameters for filtering the catalog.
///
/// Every field is optional; `None` means no constraint. `Some(0)` is a real
/// constraint, so a filter for zero bedrooms only matches studios.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive text matched against title, description, city and address
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub category: Option<Category>,
    pub city: Option<String>,
    pub provider_id: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    /// Exact match, not a minimum
    pub bedrooms: Option<u32>,
    /// Exact match, not a minimum
    pub bathrooms: Option<u32>,
    /// Every amenity listed here must be present on the record
    #[serde(default)]
    pub amenities: Vec<String>,
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    pub fn price_between(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn area_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_area = min;
        self.max_area = max;
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = Some(bedrooms);
        self
    }

    pub fn bathrooms(mut self, bathrooms: u32) -> Self {
        self.bathrooms = Some(bathrooms);
        self
    }

    pub fn amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.push(amenity.into());
        self
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_order = sort_order;
        self
    }
}

/// Sort key for search results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    /// Creation timestamp
    Date,
    Views,
    Area,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Date => "date",
            SortBy::Views => "views",
            SortBy::Area => "area",
        }
    }
}

impl FromStr for SortBy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(SortBy::Price),
            "date" => Ok(SortBy::Date),
            "views" => Ok(SortBy::Views),
            "area" => Ok(SortBy::Area),
            other => Err(UnknownVariant::new("sort key", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(UnknownVariant::new("sort order", other)),
        }
    }
}

/// Narrows feature-tag counting to one category and/or provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagScope {
    pub category: Option<Category>,
    pub provider_id: Option<String>,
}
