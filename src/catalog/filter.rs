use std::cmp::Ordering;

use crate::catalog::types::{FilterSpec, SortBy, SortOrder};
use crate::models::{Property, Role};

/// Filter and order `records` according to `spec`.
///
/// Only published listings are visible unless `role` is admin. Every active
/// criterion in `spec` must hold for a record to be kept. Sorting happens
/// only when `spec.sort_by` is set and is stable, so equal keys keep their
/// input order. Never fails: a total mismatch is an empty result.
pub fn search<'a>(records: &'a [Property], spec: &FilterSpec, role: Role) -> Vec<&'a Property> {
    let mut results: Vec<&Property> = records
        .iter()
        .filter(|property| is_visible(property, role))
        .filter(|property| matches(property, spec))
        .collect();

    if let Some(sort_by) = spec.sort_by {
        // `sort_by` on slices is stable
        results.sort_by(|a, b| {
            let ordering = compare(a, b, sort_by);
            match spec.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    results
}

/// Same as [`search`] but hands back owned records.
pub fn search_owned(records: &[Property], spec: &FilterSpec, role: Role) -> Vec<Property> {
    search(records, spec, role).into_iter().cloned().collect()
}

pub fn is_visible(property: &Property, role: Role) -> bool {
    role.is_admin() || property.is_published()
}

/// Whether `property` satisfies every active criterion in `spec`. Visibility is not checked.
pub fn matches(property: &Property, spec: &FilterSpec) -> bool {
    if let Some(provider_id) = non_empty(&spec.provider_id) {
        if property.provider_id != provider_id {
            return false;
        }
    }

    if let Some(query) = non_empty(&spec.query) {
        if !matches_query(property, query) {
            return false;
        }
    }

    if let Some(property_type) = spec.property_type {
        if property.property_type != property_type {
            return false;
        }
    }

    if let Some(category) = spec.category {
        if property.category != category {
            return false;
        }
    }

    if let Some(city) = non_empty(&spec.city) {
        if property.location.city != city {
            return false;
        }
    }

    if !within(property.price, spec.min_price, spec.max_price) {
        return false;
    }

    if spec.bedrooms.is_some() && property.features.bedrooms != spec.bedrooms {
        return false;
    }

    if spec.bathrooms.is_some() && property.features.bathrooms != spec.bathrooms {
        return false;
    }

    let area = property.features.area;
    if spec.min_area.is_some_and(|min| !(area >= min)) {
        return false;
    }
    if spec.max_area.is_some_and(|max| !(area <= max)) {
        return false;
    }

    spec.amenities
        .iter()
        .all(|wanted| property.features.amenities.iter().any(|have| have == wanted))
}

/// Case-insensitive substring match against title, description, city and address.
pub fn matches_query(property: &Property, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        property.title.as_str(),
        property.description.as_str(),
        property.location.city.as_str(),
        property.location.address.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn within(value: u64, min: Option<u64>, max: Option<u64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

fn compare(a: &Property, b: &Property, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Price => a.price.cmp(&b.price),
        SortBy::Date => a.created_at.cmp(&b.created_at),
        SortBy::Views => a.views.cmp(&b.views),
        SortBy::Area => a.features.area.total_cmp(&b.features.area),
    }
}
