pub mod provider;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use provider::{AuditEntry, Provider, ProviderStatus};
pub use session::{Role, Session};

/// Kind of property being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    House,
    Apartment,
    Land,
    Commercial,
    Airbnb,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
            PropertyType::Airbnb => "airbnb",
        }
    }
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            "airbnb" => Ok(PropertyType::Airbnb),
            other => Err(UnknownVariant::new("property type", other)),
        }
    }
}

/// How the property is offered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sale,
    Rent,
    ShortTermRental,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sale => "sale",
            Category::Rent => "rent",
            Category::ShortTermRental => "short-term-rental",
        }
    }

    /// Rent and short-term rental listings end as `rented`, never `sold`.
    pub fn is_rental(&self) -> bool {
        matches!(self, Category::Rent | Category::ShortTermRental)
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Category::Sale),
            "rent" => Ok(Category::Rent),
            "short-term-rental" => Ok(Category::ShortTermRental),
            other => Err(UnknownVariant::new("category", other)),
        }
    }
}

/// Listing lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ListingStatus {
    Draft,
    Pending,
    Published,
    Rejected,
    Sold,
    Rented,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Pending => "pending",
            ListingStatus::Published => "published",
            ListingStatus::Rejected => "rejected",
            ListingStatus::Sold => "sold",
            ListingStatus::Rented => "rented",
        }
    }

    /// Whether a listing may move from `self` to `next`.
    pub fn can_transition_to(&self, next: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Published)
                | (Pending, Rejected)
                | (Published, Sold)
                | (Published, Rented)
        )
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name any variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Location information for a property
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// Unit the floor or plot area is measured in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    Sqm,
    Sqft,
    Acres,
}

/// Physical features of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    /// Absent for land and most commercial listings
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub parking: Option<u32>,
    pub furnished: bool,
    pub pet_friendly: bool,
    pub amenities: Vec<String>,
    pub utilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyImage {
    pub url: String,
    pub alt: String,
    pub is_primary: bool,
    pub order: u32,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub category: Category,
    pub status: ListingStatus,
    pub price: u64,
    pub currency: String,
    pub location: Location,
    pub features: Features,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    pub provider_id: String,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub inquiries: u32,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    /// Moderator's note when the listing was turned down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Property {
    pub fn is_published(&self) -> bool {
        self.status == ListingStatus::Published
    }

    /// First image flagged primary, else the one with the lowest order.
    ///
    /// Several primary flags are tolerated; the earliest in the list wins.
    pub fn primary_image(&self) -> Option<&PropertyImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.iter().min_by_key(|img| img.order))
    }
}
