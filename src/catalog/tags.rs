use serde::Serialize;

use crate::catalog::types::TagScope;
use crate::models::Property;

/// Feature labels shown as filter badges
pub const FEATURE_TAGS: &[&str] = &[
    "Private Pool",
    "Swimming Pool",
    "Gym",
    "Garden",
    "Balcony",
    "Sea View",
    "Parking",
    "Security",
    "Backup Generator",
    "Borehole",
    "Furnished",
    "Pet Friendly",
    "Wi-Fi",
    "Air Conditioning",
];

/// How many listings carry a given feature tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Loose match: either string contains the other, ignoring case.
///
/// Blank amenities never match; an empty string is contained in every tag.
pub fn tag_matches_amenity(tag: &str, amenity: &str) -> bool {
    let amenity = amenity.trim().to_lowercase();
    let tag = tag.trim().to_lowercase();
    if amenity.is_empty() || tag.is_empty() {
        return false;
    }
    tag.contains(&amenity) || amenity.contains(&tag)
}

pub fn has_feature_tag(property: &Property, tag: &str) -> bool {
    property
        .features
        .amenities
        .iter()
        .any(|amenity| tag_matches_amenity(tag, amenity))
}

/// Count published listings per tag, in `tags` order.
///
/// Rescans every record for every tag.
pub fn count_feature_tags(records: &[Property], tags: &[&str], scope: &TagScope) -> Vec<TagCount> {
    let in_scope: Vec<&Property> = records
        .iter()
        .filter(|p| p.is_published())
        .filter(|p| scope.category.map_or(true, |c| p.category == c))
        .filter(|p| {
            scope
                .provider_id
                .as_deref()
                .map_or(true, |id| p.provider_id == id)
        })
        .collect();

    tags.iter()
        .map(|tag| TagCount {
            tag: tag.to_string(),
            count: in_scope.iter().filter(|p| has_feature_tag(p, tag)).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::listing;
    use crate::models::{Category, ListingStatus};

    fn with_amenities(id: &str, amenities: &[&str]) -> Property {
        let mut p = listing(id, 100, "Diani");
        p.features.amenities = amenities.iter().map(|a| a.to_string()).collect();
        p
    }

    #[test]
    fn containment_works_in_both_directions() {
        assert!(tag_matches_amenity("Private Pool", "pool"));
        assert!(tag_matches_amenity("Gym", "Gym & Spa"));
        assert!(tag_matches_amenity("wi-fi", "WI-FI"));
    }

    #[test]
    fn overlapping_words_alone_do_not_match() {
        assert!(!tag_matches_amenity("Water Views", "Water Access"));
        assert!(!tag_matches_amenity("Sea View", "Garden View"));
    }

    #[test]
    fn blank_amenities_never_match() {
        assert!(!tag_matches_amenity("Gym", ""));
        assert!(!tag_matches_amenity("Gym", "   "));
    }

    #[test]
    fn short_amenities_match_loosely() {
        // Known imprecision of containment matching.
        assert!(tag_matches_amenity("Garden", "den"));
    }

    #[test]
    fn counts_only_published_records() {
        let mut hidden = with_amenities("hidden", &["Private Pool"]);
        hidden.status = ListingStatus::Pending;
        let records = vec![
            with_amenities("a", &["Pool", "Gym"]),
            with_amenities("b", &["Swimming pool"]),
            hidden,
        ];

        let counts = count_feature_tags(&records, &["Private Pool", "Gym", "Borehole"], &TagScope::default());
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "Private Pool".into(), count: 1 },
                TagCount { tag: "Gym".into(), count: 1 },
                TagCount { tag: "Borehole".into(), count: 0 },
            ]
        );
    }

    #[test]
    fn a_record_counts_once_per_tag() {
        let records = vec![with_amenities("a", &["Pool", "Private Pool", "pool deck"])];
        let counts = count_feature_tags(&records, &["Private Pool"], &TagScope::default());
        assert_eq!(counts[0].count, 1);
    }

    #[test]
    fn scope_narrows_by_category_and_provider() {
        let mut rental = with_amenities("rental", &["Gym"]);
        rental.category = Category::Rent;
        let mut other_provider = with_amenities("other", &["Gym"]);
        other_provider.provider_id = "prov-2".into();
        let records = vec![with_amenities("sale", &["Gym"]), rental, other_provider];

        let by_category = TagScope {
            category: Some(Category::Rent),
            provider_id: None,
        };
        assert_eq!(count_feature_tags(&records, &["Gym"], &by_category)[0].count, 1);

        let by_provider = TagScope {
            category: None,
            provider_id: Some("prov-1".into()),
        };
        assert_eq!(count_feature_tags(&records, &["Gym"], &by_provider)[0].count, 2);

        let both = TagScope {
            category: Some(Category::Sale),
            provider_id: Some("prov-2".into()),
        };
        assert_eq!(count_feature_tags(&records, &["Gym"], &both)[0].count, 1);
    }

    #[test]
    fn default_vocabulary_has_no_duplicates() {
        let mut tags = FEATURE_TAGS.to_vec();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), FEATURE_TAGS.len());
    }
}
