use anyhow::Context;
use property_catalog::activity::{
    ActivityEvent, ActivityFeed, ActivityKind, Audience, BroadcastActivitySource,
};
use property_catalog::catalog::TagScope;
use property_catalog::config::Config;
use property_catalog::models::{AreaUnit, Category, Features, Location, PropertyType, Role};
use property_catalog::repository::JsonFileRepository;
use property_catalog::{logging, FilterSpec, NewListing, PropertyStore, Session};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    info!("🏠 Property Catalog");
    info!("Catalog file: {}", config.catalog_path.display());

    let repo = JsonFileRepository::new(&config.catalog_path);
    let mut store = PropertyStore::open(repo)
        .await
        .context("Failed to open catalog")?;

    let admin = Session::new("admin", Role::Admin);
    let activity = Arc::new(BroadcastActivitySource::new());
    let mut feed = ActivityFeed::start(
        activity.clone(),
        &admin,
        Audience::Admin,
        config.activity_poll_interval,
    )?;

    if store.records().is_empty() {
        info!("Catalog is empty, adding demo listings...");
        for listing in demo_listings() {
            let property = store.submit(&admin, listing).await?;
            activity.publish(
                ActivityEvent::new(
                    ActivityKind::PropertySubmitted,
                    &admin.user_id,
                    &property.id,
                    format!("Published {}", property.title),
                )
                .with_provider(&property.provider_id),
            );
        }
    }

    // Filter given as a listing-page query string, e.g. "category=sale&sortBy=price&sortOrder=desc"
    let query = std::env::args().nth(1).unwrap_or_default();
    let spec = FilterSpec::from_query(&query).context("Invalid filter")?;
    let results = store.search(&Session::guest(), &spec);

    info!("✅ {} matching properties", results.len());
    for (i, property) in results.iter().enumerate() {
        println!(
            "{}. {} ({} {})",
            i + 1,
            property.title,
            property.price,
            property.currency
        );
        println!(
            "   {} · {} · {}",
            property.property_type.as_str(),
            property.category.as_str(),
            property.location.city
        );
        if let Some(bedrooms) = property.features.bedrooms {
            println!("   {} bedrooms, {} {:?}", bedrooms, property.features.area, property.features.area_unit);
        }
        println!("   Amenities: {}", property.features.amenities.join(", "));
        println!("   ID: {}", property.id);
        println!();
    }

    let scope = TagScope {
        category: spec.category,
        provider_id: spec.provider_id.clone(),
    };
    for count in store.feature_tag_counts(&scope).iter().filter(|c| c.count > 0) {
        println!("   {:<18} {}", count.tag, count.count);
    }

    // Drain whatever the feed picked up while seeding
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(100), feed.next()).await {
        info!("📣 {}", event.message);
    }
    feed.stop();

    Ok(())
}

fn demo_listings() -> Vec<NewListing> {
    let location = |address: &str, city: &str, state: &str| Location {
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        country: "Kenya".to_string(),
        postal_code: String::new(),
    };
    let amenities = |list: &[&str]| list.iter().map(|a| a.to_string()).collect::<Vec<_>>();

    vec![
        NewListing {
            title: "Beachfront villa in Nyali".to_string(),
            description: "Four bedroom villa with a private pool and direct beach access.".to_string(),
            property_type: PropertyType::House,
            category: Category::Sale,
            price: 85_000_000,
            currency: "KES".to_string(),
            location: location("Links Road", "Mombasa", "Mombasa"),
            features: Features {
                bedrooms: Some(4),
                bathrooms: Some(4),
                area: 420.0,
                area_unit: AreaUnit::Sqm,
                parking: Some(3),
                furnished: true,
                amenities: amenities(&["Private Pool", "Sea View", "Backup Generator"]),
                ..Features::default()
            },
            images: Vec::new(),
        },
        NewListing {
            title: "Lakeside apartment in Milimani".to_string(),
            description: "Two bedroom apartment with lake views, water included.".to_string(),
            property_type: PropertyType::Apartment,
            category: Category::Rent,
            price: 120_000,
            currency: "KES".to_string(),
            location: location("Milimani Road", "Kisumu", "Kisumu"),
            features: Features {
                bedrooms: Some(2),
                bathrooms: Some(2),
                area: 110.0,
                area_unit: AreaUnit::Sqm,
                parking: Some(1),
                amenities: amenities(&["Gym", "Security", "Borehole"]),
                ..Features::default()
            },
            images: Vec::new(),
        },
        NewListing {
            title: "Family home in Karen".to_string(),
            description: "Five bedroom home on half an acre with a mature garden.".to_string(),
            property_type: PropertyType::House,
            category: Category::Sale,
            price: 50_000_000,
            currency: "KES".to_string(),
            location: location("Karen Road", "Nairobi", "Nairobi"),
            features: Features {
                bedrooms: Some(5),
                bathrooms: Some(4),
                area: 0.5,
                area_unit: AreaUnit::Acres,
                parking: Some(4),
                pet_friendly: true,
                amenities: amenities(&["Garden", "Security", "Borehole"]),
                ..Features::default()
            },
            images: Vec::new(),
        },
        NewListing {
            title: "Diani holiday cottage".to_string(),
            description: "Two bedroom cottage minutes from the beach, sleeps five.".to_string(),
            property_type: PropertyType::Airbnb,
            category: Category::ShortTermRental,
            price: 15_000,
            currency: "KES".to_string(),
            location: location("Diani Beach Road", "Diani", "Kwale"),
            features: Features {
                bedrooms: Some(2),
                bathrooms: Some(1),
                area: 75.0,
                area_unit: AreaUnit::Sqm,
                furnished: true,
                amenities: amenities(&["Swimming Pool", "Wi-Fi", "Air Conditioning"]),
                ..Features::default()
            },
            images: Vec::new(),
        },
    ]
}
