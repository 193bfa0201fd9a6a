use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::{self, FilterSpec, TagCount, TagScope, FEATURE_TAGS};
use crate::error::{CatalogError, Result};
use crate::models::{
    Category, Features, ListingStatus, Location, Property, PropertyImage, PropertyType, Role,
    Session,
};
use crate::repository::PropertyRepository;

/// A listing as submitted by a provider or admin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub category: Category,
    pub price: u64,
    pub currency: String,
    pub location: Location,
    pub features: Features,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
}

/// Partial edit of a listing; `None` leaves a field as it is
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub category: Option<Category>,
    pub price: Option<u64>,
    pub currency: Option<String>,
    pub location: Option<Location>,
    pub features: Option<Features>,
    pub images: Option<Vec<PropertyImage>>,
}

/// In-memory catalog backed by a [`PropertyRepository`].
///
/// Every command builds the next catalog, saves it, and only then replaces
/// the in-memory copy. A failed save leaves the store as it was. There is
/// no version check between sessions: the last write wins.
pub struct PropertyStore<R: PropertyRepository> {
    repo: R,
    records: Vec<Property>,
}

impl<R: PropertyRepository> PropertyStore<R> {
    pub async fn open(repo: R) -> Result<Self> {
        let records = repo.load().await?;
        info!(
            backend = repo.backend_name(),
            "Opened catalog with {} properties",
            records.len()
        );
        Ok(Self { repo, records })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn records(&self) -> &[Property] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.records.iter().find(|p| p.id == id)
    }

    pub fn search(&self, session: &Session, spec: &FilterSpec) -> Vec<&Property> {
        catalog::search(&self.records, spec, session.role)
    }

    /// Every listing of one provider, whatever its status (dashboard view)
    pub fn by_provider(&self, provider_id: &str) -> Vec<&Property> {
        self.records
            .iter()
            .filter(|p| p.provider_id == provider_id)
            .collect()
    }

    pub fn feature_tag_counts(&self, scope: &TagScope) -> Vec<TagCount> {
        catalog::count_feature_tags(&self.records, FEATURE_TAGS, scope)
    }

    /// Submit a listing for review. Admin submissions are published at once.
    pub async fn submit(&mut self, session: &Session, listing: NewListing) -> Result<Property> {
        let status = if session.is_admin() {
            ListingStatus::Published
        } else {
            ListingStatus::Pending
        };
        self.create(session, listing, status).await
    }

    /// Store a listing the provider is still working on. Drafts are never public.
    pub async fn save_draft(&mut self, session: &Session, listing: NewListing) -> Result<Property> {
        self.create(session, listing, ListingStatus::Draft).await
    }

    /// Send a draft off for review, or publish it when an admin submits it
    pub async fn submit_draft(&mut self, session: &Session, id: &str) -> Result<Property> {
        self.authorize_owner(session, id)?;
        let publish = session.is_admin();

        self.modify(id, |property| {
            if property.status != ListingStatus::Draft {
                return Err(CatalogError::invalid_transition(
                    "property",
                    &property.id,
                    property.status,
                    ListingStatus::Pending,
                ));
            }
            let now = Utc::now();
            property.status = if publish {
                property.published_at = Some(now);
                ListingStatus::Published
            } else {
                ListingStatus::Pending
            };
            property.updated_at = now;
            Ok(())
        })
        .await
    }

    pub async fn update(
        &mut self,
        session: &Session,
        id: &str,
        changes: ListingUpdate,
    ) -> Result<Property> {
        self.authorize_owner(session, id)?;

        self.modify(id, move |property| {
            apply_update(property, changes);
            validate(
                &property.title,
                property.price,
                &property.currency,
                &property.location,
                &property.features,
            )?;
            property.updated_at = Utc::now();
            Ok(())
        })
        .await
    }

    pub async fn delete(&mut self, session: &Session, id: &str) -> Result<()> {
        self.authorize_owner(session, id)?;

        let next: Vec<Property> = self.records.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(next).await?;
        info!(property_id = id, actor = %session.user_id, "Deleted property");
        Ok(())
    }

    pub async fn approve(&mut self, session: &Session, id: &str) -> Result<Property> {
        require_admin(session, "approve listings")?;

        let property = self
            .modify(id, |property| {
                transition(property, ListingStatus::Published)?;
                property.published_at = Some(property.updated_at);
                Ok(())
            })
            .await?;
        info!(property_id = id, actor = %session.user_id, "Approved property");
        Ok(property)
    }

    pub async fn reject(
        &mut self,
        session: &Session,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Property> {
        require_admin(session, "reject listings")?;

        let property = self
            .modify(id, |property| {
                transition(property, ListingStatus::Rejected)?;
                property.rejection_reason = reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string);
                Ok(())
            })
            .await?;
        info!(
            property_id = id,
            actor = %session.user_id,
            reason = reason.unwrap_or(""),
            "Rejected property"
        );
        Ok(property)
    }

    pub async fn mark_sold(&mut self, session: &Session, id: &str) -> Result<Property> {
        self.authorize_owner(session, id)?;

        self.modify(id, |property| {
            if property.category != Category::Sale {
                return Err(CatalogError::Validation(format!(
                    "only sale listings can be sold, this one is for {}",
                    property.category.as_str()
                )));
            }
            transition(property, ListingStatus::Sold)
        })
        .await
    }

    pub async fn mark_rented(&mut self, session: &Session, id: &str) -> Result<Property> {
        self.authorize_owner(session, id)?;

        self.modify(id, |property| {
            if !property.category.is_rental() {
                return Err(CatalogError::Validation(
                    "only rental listings can be rented".to_string(),
                ));
            }
            transition(property, ListingStatus::Rented)
        })
        .await
    }

    pub async fn set_featured(
        &mut self,
        session: &Session,
        id: &str,
        featured: bool,
    ) -> Result<Property> {
        require_admin(session, "feature listings")?;

        self.modify(id, |property| {
            property.featured = featured;
            Ok(())
        })
        .await
    }

    /// Count a detail-page view. Returns the new total.
    pub async fn record_view(&mut self, id: &str) -> Result<u32> {
        let property = self
            .modify(id, |property| {
                property.views = property.views.saturating_add(1);
                Ok(())
            })
            .await?;
        Ok(property.views)
    }

    /// Count an inquiry sent to the provider. Returns the new total.
    pub async fn record_inquiry(&mut self, id: &str) -> Result<u32> {
        let property = self
            .modify(id, |property| {
                property.inquiries = property.inquiries.saturating_add(1);
                Ok(())
            })
            .await?;
        Ok(property.inquiries)
    }

    async fn create(
        &mut self,
        session: &Session,
        listing: NewListing,
        status: ListingStatus,
    ) -> Result<Property> {
        if !matches!(session.role, Role::Provider | Role::Admin) {
            return Err(CatalogError::Unauthorized(
                "only providers and admins can list properties".to_string(),
            ));
        }
        validate(
            &listing.title,
            listing.price,
            &listing.currency,
            &listing.location,
            &listing.features,
        )?;

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4().to_string(),
            title: listing.title.trim().to_string(),
            description: listing.description,
            property_type: listing.property_type,
            category: listing.category,
            status,
            price: listing.price,
            currency: listing.currency,
            location: listing.location,
            features: listing.features,
            images: listing.images,
            provider_id: session.user_id.clone(),
            views: 0,
            inquiries: 0,
            featured: false,
            created_at: now,
            updated_at: now,
            published_at: (status == ListingStatus::Published).then_some(now),
            rejection_reason: None,
        };

        let mut next = self.records.clone();
        next.push(property.clone());
        self.commit(next).await?;

        info!(
            property_id = %property.id,
            provider = %property.provider_id,
            status = %property.status,
            "Created property"
        );
        Ok(property)
    }

    /// Apply `change` to a copy of one record and persist the result
    async fn modify<F>(&mut self, id: &str, change: F) -> Result<Property>
    where
        F: FnOnce(&mut Property) -> Result<()>,
    {
        let mut next = self.records.clone();
        let property = next
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::not_found("property", id))?;
        change(&mut *property)?;
        let updated = property.clone();

        self.commit(next).await?;
        debug!(property_id = id, status = %updated.status, "Updated property");
        Ok(updated)
    }

    async fn commit(&mut self, next: Vec<Property>) -> Result<()> {
        if let Err(err) = self.repo.save(&next).await {
            error!(
                backend = self.repo.backend_name(),
                "Failed to persist catalog: {err:#}"
            );
            return Err(CatalogError::Persistence(err));
        }
        self.records = next;
        Ok(())
    }

    fn authorize_owner(&self, session: &Session, id: &str) -> Result<()> {
        let property = self
            .get(id)
            .ok_or_else(|| CatalogError::not_found("property", id))?;
        if session.can_manage(&property.provider_id) {
            Ok(())
        } else {
            warn!(property_id = id, user = %session.user_id, "Refused change to foreign listing");
            Err(CatalogError::Unauthorized(
                "you can only manage your own listings".to_string(),
            ))
        }
    }
}

fn require_admin(session: &Session, action: &str) -> Result<()> {
    if session.is_admin() {
        Ok(())
    } else {
        warn!(user = %session.user_id, "Non-admin tried to {action}");
        Err(CatalogError::Unauthorized(format!("only admins can {action}")))
    }
}

fn transition(property: &mut Property, to: ListingStatus) -> Result<()> {
    if !property.status.can_transition_to(to) {
        return Err(CatalogError::invalid_transition(
            "property",
            &property.id,
            property.status,
            to,
        ));
    }
    property.status = to;
    property.updated_at = Utc::now();
    Ok(())
}

fn apply_update(property: &mut Property, changes: ListingUpdate) {
    if let Some(title) = changes.title {
        property.title = title.trim().to_string();
    }
    if let Some(description) = changes.description {
        property.description = description;
    }
    if let Some(property_type) = changes.property_type {
        property.property_type = property_type;
    }
    if let Some(category) = changes.category {
        property.category = category;
    }
    if let Some(price) = changes.price {
        property.price = price;
    }
    if let Some(currency) = changes.currency {
        property.currency = currency;
    }
    if let Some(location) = changes.location {
        property.location = location;
    }
    if let Some(features) = changes.features {
        property.features = features;
    }
    if let Some(images) = changes.images {
        property.images = images;
    }
}

fn validate(
    title: &str,
    price: u64,
    currency: &str,
    location: &Location,
    features: &Features,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CatalogError::Validation("title is required".to_string()));
    }
    if price == 0 {
        return Err(CatalogError::Validation(
            "price must be greater than zero".to_string(),
        ));
    }
    if currency.trim().is_empty() {
        return Err(CatalogError::Validation("currency is required".to_string()));
    }
    if location.city.trim().is_empty() {
        return Err(CatalogError::Validation("city is required".to_string()));
    }
    if !features.area.is_finite() || features.area < 0.0 {
        return Err(CatalogError::Validation(
            "area must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
