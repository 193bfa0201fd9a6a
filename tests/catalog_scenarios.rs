use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use property_catalog::catalog::{search, search_owned, FilterSpec, SortBy, SortOrder};
use property_catalog::models::{
    Category, Features, ListingStatus, Location, Property, PropertyType, Role, Session,
};
use property_catalog::repository::{JsonFileRepository, PropertyRepository};
use property_catalog::{ListingUpdate, NewListing, PropertyStore};
use tempfile::tempdir;

fn property(id: &str, price: u64, city: &str, category: Category) -> Property {
    let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    Property {
        id: id.to_string(),
        title: format!("{city} listing"),
        description: String::new(),
        property_type: PropertyType::House,
        category,
        status: ListingStatus::Published,
        price,
        currency: "KES".to_string(),
        location: Location {
            city: city.to_string(),
            country: "Kenya".to_string(),
            ..Location::default()
        },
        features: Features {
            area: 150.0,
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

fn coastal_catalog() -> Vec<Property> {
    vec![
        property("mombasa", 85_000_000, "Mombasa", Category::Sale),
        property("kisumu", 120_000, "Kisumu", Category::Rent),
        property("nairobi", 50_000_000, "Nairobi", Category::Sale),
    ]
}

fn cities(results: &[&Property]) -> Vec<String> {
    results.iter().map(|p| p.location.city.clone()).collect()
}

#[test]
fn sale_listings_sorted_by_price_descending() {
    let records = coastal_catalog();
    let spec = FilterSpec::new()
        .category(Category::Sale)
        .sorted(SortBy::Price, SortOrder::Desc);

    let results = search(&records, &spec, Role::Guest);
    assert_eq!(cities(&results), vec!["Mombasa", "Nairobi"]);
    assert_eq!(results[0].price, 85_000_000);
    assert_eq!(results[1].price, 50_000_000);
}

#[test]
fn same_scenario_from_a_query_string() -> Result<()> {
    let records = coastal_catalog();
    let spec = FilterSpec::from_query("?category=sale&sortBy=price&sortOrder=desc")?;

    assert_eq!(cities(&search(&records, &spec, Role::Customer)), vec!["Mombasa", "Nairobi"]);
    Ok(())
}

#[test]
fn search_leaves_the_input_untouched() {
    let records = coastal_catalog();
    let before = records.clone();
    let spec = FilterSpec::new().sorted(SortBy::Price, SortOrder::Asc);

    let sorted = search_owned(&records, &spec, Role::Guest);
    assert_eq!(records, before);
    assert_eq!(sorted.first().map(|p| p.id.as_str()), Some("kisumu"));
}

#[test]
fn narrowing_a_result_set_again() {
    let records = coastal_catalog();
    let sales = search_owned(&records, &FilterSpec::new().category(Category::Sale), Role::Guest);
    let cheap_sales = search(
        &sales,
        &FilterSpec::new().price_between(None, Some(60_000_000)),
        Role::Guest,
    );
    let combined = search(
        &records,
        &FilterSpec::new()
            .category(Category::Sale)
            .price_between(None, Some(60_000_000)),
        Role::Guest,
    );
    assert_eq!(cities(&cheap_sales), cities(&combined));
}

#[test]
fn newest_first_by_date() {
    let mut records = coastal_catalog();
    for (offset, record) in records.iter_mut().enumerate() {
        record.created_at += Duration::days(offset as i64);
    }

    let spec = FilterSpec::new().sorted(SortBy::Date, SortOrder::Desc);
    assert_eq!(
        cities(&search(&records, &spec, Role::Guest)),
        vec!["Nairobi", "Kisumu", "Mombasa"]
    );
}

#[tokio::test]
async fn store_round_trip_through_json_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("catalog.json");
    let provider = Session::new("prov-9", Role::Provider);
    let admin = Session::new("admin-1", Role::Admin);

    let id = {
        let mut store = PropertyStore::open(JsonFileRepository::new(&path)).await?;
        let submitted = store
            .submit(
                &provider,
                NewListing {
                    title: "Studio in Westlands".to_string(),
                    description: "Compact studio near the mall".to_string(),
                    property_type: PropertyType::Apartment,
                    category: Category::Rent,
                    price: 45_000,
                    currency: "KES".to_string(),
                    location: Location {
                        address: "Waiyaki Way".to_string(),
                        city: "Nairobi".to_string(),
                        ..Location::default()
                    },
                    features: Features {
                        bedrooms: Some(0),
                        bathrooms: Some(1),
                        area: 32.0,
                        amenities: vec!["Gym".to_string(), "Wi-Fi".to_string()],
                        ..Features::default()
                    },
                    images: Vec::new(),
                },
            )
            .await?;
        store.approve(&admin, &submitted.id).await?;
        store
            .update(
                &provider,
                &submitted.id,
                ListingUpdate {
                    price: Some(42_000),
                    ..ListingUpdate::default()
                },
            )
            .await?;
        submitted.id
    };

    let reopened = PropertyStore::open(JsonFileRepository::new(&path)).await?;
    let property = reopened.get(&id).expect("listing persisted");
    assert_eq!(property.status, ListingStatus::Published);
    assert_eq!(property.price, 42_000);

    let studios = reopened.search(
        &Session::guest(),
        &FilterSpec::from_query("bedrooms=0&query=westlands&amenities=Gym")?,
    );
    assert_eq!(studios.len(), 1);

    let raw = JsonFileRepository::new(&path).load().await?;
    assert_eq!(raw.len(), 1);
    Ok(())
}
