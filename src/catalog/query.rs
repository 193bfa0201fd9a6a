use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::types::{FilterSpec, SortOrder};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Malformed query string: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),

    #[error("Invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// The filter as it appears in page URLs, before any value is interpreted
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bedrooms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bathrooms: Option<String>,
    /// Comma separated
    #[serde(skip_serializing_if = "Option::is_none")]
    amenities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<String>,
}

impl FilterSpec {
    /// Decode a filter from URL query parameters (`?type=house&minPrice=100`).
    ///
    /// A leading `?` is accepted. Empty values count as absent; unknown keys
    /// are ignored.
    pub fn from_query(input: &str) -> Result<Self, QueryError> {
        let raw: RawQuery = serde_urlencoded::from_str(input.trim_start_matches('?'))?;

        let amenities = raw
            .amenities
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(FilterSpec {
            query: text(raw.query),
            property_type: parse("type", raw.property_type)?,
            category: parse("category", raw.category)?,
            city: text(raw.city),
            provider_id: text(raw.provider),
            min_price: parse("minPrice", raw.min_price)?,
            max_price: parse("maxPrice", raw.max_price)?,
            min_area: parse_area("minArea", raw.min_area)?,
            max_area: parse_area("maxArea", raw.max_area)?,
            bedrooms: parse("bedrooms", raw.bedrooms)?,
            bathrooms: parse("bathrooms", raw.bathrooms)?,
            amenities,
            sort_by: parse("sortBy", raw.sort_by)?,
            sort_order: parse("sortOrder", raw.sort_order)?.unwrap_or_default(),
        })
    }

    /// Encode the filter as URL query parameters, leaving out absent fields.
    pub fn to_query(&self) -> String {
        let raw = RawQuery {
            query: self.query.clone().filter(|q| !q.is_empty()),
            property_type: self.property_type.map(|t| t.as_str().to_string()),
            category: self.category.map(|c| c.as_str().to_string()),
            city: self.city.clone().filter(|c| !c.is_empty()),
            provider: self.provider_id.clone().filter(|p| !p.is_empty()),
            min_price: self.min_price.map(|v| v.to_string()),
            max_price: self.max_price.map(|v| v.to_string()),
            min_area: self.min_area.map(|v| v.to_string()),
            max_area: self.max_area.map(|v| v.to_string()),
            bedrooms: self.bedrooms.map(|v| v.to_string()),
            bathrooms: self.bathrooms.map(|v| v.to_string()),
            amenities: (!self.amenities.is_empty()).then(|| self.amenities.join(",")),
            sort_by: self.sort_by.map(|s| s.as_str().to_string()),
            // Only meaningful next to a sort key
            sort_order: self
                .sort_by
                .filter(|_| self.sort_order != SortOrder::Asc)
                .map(|_| self.sort_order.as_str().to_string()),
        };

        // Every field is a plain string, which the encoder cannot reject
        serde_urlencoded::to_string(&raw).unwrap_or_default()
    }
}

fn text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, QueryError> {
    match text(value) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| QueryError::InvalidValue { key, value: v }),
    }
}

fn parse_area(key: &'static str, value: Option<String>) -> Result<Option<f64>, QueryError> {
    let area: Option<f64> = parse(key, value.clone())?;
    match area {
        Some(a) if !a.is_finite() || a < 0.0 => Err(QueryError::InvalidValue {
            key,
            value: value.unwrap_or_default(),
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::SortBy;
    use crate::models::{Category, PropertyType};

    #[test]
    fn decodes_listing_page_parameters() {
        let spec = FilterSpec::from_query(
            "?type=house&city=Nairobi&minPrice=1000000&maxPrice=9000000&bedrooms=3&sortBy=price&sortOrder=desc&provider=prov-7",
        )
        .unwrap();

        assert_eq!(spec.property_type, Some(PropertyType::House));
        assert_eq!(spec.city.as_deref(), Some("Nairobi"));
        assert_eq!(spec.min_price, Some(1_000_000));
        assert_eq!(spec.max_price, Some(9_000_000));
        assert_eq!(spec.bedrooms, Some(3));
        assert_eq!(spec.sort_by, Some(SortBy::Price));
        assert_eq!(spec.sort_order, SortOrder::Desc);
        assert_eq!(spec.provider_id.as_deref(), Some("prov-7"));
        assert_eq!(spec.category, None);
    }

    #[test]
    fn percent_encoded_text_and_amenity_list() {
        let spec = FilterSpec::from_query(
            "query=sea%20view&category=short-term-rental&amenities=Pool,%20Wi-Fi,,Gym",
        )
        .unwrap();

        assert_eq!(spec.query.as_deref(), Some("sea view"));
        assert_eq!(spec.category, Some(Category::ShortTermRental));
        assert_eq!(spec.amenities, vec!["Pool", "Wi-Fi", "Gym"]);
    }

    #[test]
    fn empty_values_and_unknown_keys_are_ignored() {
        let spec = FilterSpec::from_query("city=&minPrice=&page=2&utm_source=mail").unwrap();
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn zero_survives_decoding() {
        let spec = FilterSpec::from_query("bedrooms=0&minPrice=0").unwrap();
        assert_eq!(spec.bedrooms, Some(0));
        assert_eq!(spec.min_price, Some(0));
    }

    #[test]
    fn rejects_malformed_values() {
        for input in [
            "minPrice=cheap",
            "minPrice=-5",
            "type=castle",
            "sortBy=rating",
            "sortOrder=up",
            "minArea=NaN",
        ] {
            let err = FilterSpec::from_query(input).unwrap_err();
            assert!(matches!(err, QueryError::InvalidValue { .. }), "{input}");
        }
    }

    #[test]
    fn encoding_omits_absent_fields() {
        let spec = FilterSpec::new()
            .city("Nairobi")
            .bedrooms(2)
            .sorted(SortBy::Date, SortOrder::Desc);
        assert_eq!(spec.to_query(), "city=Nairobi&bedrooms=2&sortBy=date&sortOrder=desc");
        assert_eq!(FilterSpec::default().to_query(), "");
    }

    #[test]
    fn encoded_filter_decodes_to_the_same_filter() {
        let spec = FilterSpec::new()
            .query("ocean & palms")
            .property_type(PropertyType::Airbnb)
            .category(Category::ShortTermRental)
            .price_between(Some(5_000), Some(20_000))
            .area_between(Some(40.5), None)
            .amenity("Pool")
            .amenity("Wi-Fi")
            .sorted(SortBy::Views, SortOrder::Desc);

        assert_eq!(FilterSpec::from_query(&spec.to_query()).unwrap(), spec);
    }
}
