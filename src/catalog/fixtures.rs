use chrono::{TimeZone, Utc};

use crate::models::{
    AreaUnit, Category, Features, ListingStatus, Location, Property, PropertyType,
};

/// A published sale apartment with neutral text fields.
pub fn listing(id: &str, price: u64, city: &str) -> Property {
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Property {
        id: id.to_string(),
        title: format!("Listing {id}"),
        description: "Test listing".to_string(),
        property_type: PropertyType::Apartment,
        category: Category::Sale,
        status: ListingStatus::Published,
        price,
        currency: "KES".to_string(),
        location: Location {
            address: "1 Test Street".to_string(),
            city: city.to_string(),
            state: String::new(),
            country: "Kenya".to_string(),
            postal_code: String::new(),
        },
        features: Features {
            area: 100.0,
            area_unit: AreaUnit::Sqm,
            ..Features::default()
        },
        images: Vec::new(),
        provider_id: "prov-1".to_string(),
        views: 0,
        inquiries: 0,
        featured: false,
        created_at: created,
        updated_at: created,
        published_at: Some(created),
        rejection_reason: None,
    }
}
