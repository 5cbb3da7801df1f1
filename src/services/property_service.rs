use crate::dto::property_dto::{PropertyFilter, PropertyPayload};
use crate::error::Result;
use crate::models::property::Property;
use crate::sheets::{CatalogUser, TabularStore};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_AREAS: [&str; 5] = [
    "Dubai Marina",
    "Downtown Dubai",
    "Palm Jumeirah",
    "Business Bay",
    "JBR",
];

pub const DEFAULT_USERS: [&str; 3] = ["Admin", "Broker 1", "Broker 2"];

fn numeric(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

fn eq_filter(wanted: &Option<String>, stored: &str) -> bool {
    match wanted {
        Some(value) => stored == value,
        None => true,
    }
}

fn range_filter(min: &Option<String>, max: &Option<String>, stored: &str) -> bool {
    let value = numeric(stored);
    if let Some(min) = min.as_ref().and_then(|m| m.trim().parse::<f64>().ok()) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max.as_ref().and_then(|m| m.trim().parse::<f64>().ok()) {
        if value > max {
            return false;
        }
    }
    true
}

/// AND of every supplied criterion; an absent criterion always holds.
pub fn matches(property: &Property, filter: &PropertyFilter) -> bool {
    if !eq_filter(&filter.emirate, &property.emirate)
        || !eq_filter(&filter.area, &property.area)
        || !eq_filter(&filter.offering_type, &property.offering_type)
        || !eq_filter(&filter.deal_type, &property.deal_type)
        || !eq_filter(&filter.property_type, &property.property_type)
        || !eq_filter(&filter.property_sub_type, &property.property_sub_type)
        || !eq_filter(&filter.completion_status, &property.completion_status)
        || !eq_filter(&filter.finishing_type, &property.finishing_type)
        || !eq_filter(&filter.furnish_status, &property.furnish_status)
        || !eq_filter(&filter.bedrooms, &property.bedrooms)
        || !eq_filter(&filter.bathrooms, &property.bathrooms)
        || !eq_filter(&filter.parking, &property.parking)
        || !eq_filter(&filter.facing, &property.facing)
        || !eq_filter(&filter.listing_user, &property.listing_user)
        || !eq_filter(&filter.unit_number, &property.unit_number)
        || !eq_filter(&filter.permit_number, &property.permit_number)
        || !eq_filter(&filter.cheques_count, &property.cheques_count)
    {
        return false;
    }

    // Contact-name search over the stored contacts JSON. A blob that does
    // not parse skips this criterion rather than excluding the row.
    if let Some(ref developer) = filter.developer_name {
        if let Ok(serde_json::Value::Array(contacts)) =
            serde_json::from_str::<serde_json::Value>(&property.contacts_json)
        {
            let needle = developer.to_lowercase();
            let found = contacts.iter().any(|contact| {
                contact["name"]
                    .as_str()
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            });
            if !found {
                return false;
            }
        }
    }

    if !range_filter(&filter.min_price, &filter.max_price, &property.total_price_aed)
        || !range_filter(
            &filter.min_down_payment,
            &filter.max_down_payment,
            &property.down_payment_aed,
        )
        || !range_filter(&filter.min_size, &filter.max_size, &property.size_value)
        || !range_filter(&filter.min_age, &filter.max_age, &property.property_age_years)
    {
        return false;
    }

    if let Some(ref keyword) = filter.keyword {
        let needle = keyword.to_lowercase();
        let haystack = [
            &property.title_en,
            &property.title_ar,
            &property.about_en,
            &property.about_ar,
            &property.notes,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }

    if let Some(ref amenities) = filter.amenities {
        let wanted: Vec<String> = amenities
            .split(',')
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        if !wanted.is_empty() {
            let available = [
                &property.amenities_basic,
                &property.amenities_featured,
                &property.amenities_nearby,
            ]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .to_lowercase();
            if !wanted.iter().all(|a| available.contains(a.as_str())) {
                return false;
            }
        }
    }

    true
}

#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn TabularStore>,
}

impl PropertyService {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let mut properties = self.store.read_properties().await?;
        properties.retain(|p| matches(p, filter));
        Ok(properties)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>> {
        let properties = self.store.read_properties().await?;
        Ok(properties.into_iter().find(|p| p.id == id))
    }

    pub async fn create(&self, payload: PropertyPayload) -> Result<Property> {
        let now = chrono::Utc::now().to_rfc3339();
        let property = payload.into_property(Uuid::new_v4().to_string(), now.clone(), now);
        self.store.append_property(&property).await?;
        Ok(property)
    }

    pub async fn update(&self, id: &str, payload: PropertyPayload) -> Result<Property> {
        let now = chrono::Utc::now().to_rfc3339();
        let created_at = payload.created_at.clone().unwrap_or_else(|| now.clone());
        let property = payload.into_property(id.to_string(), created_at, now);
        self.store.update_property(id, &property).await?;
        Ok(property)
    }

    /// Area and employee lookups never fail the request: a missing tab or an
    /// unreachable store degrades to the hardcoded defaults.
    pub async fn areas(&self) -> Vec<String> {
        match self.store.read_areas().await {
            Ok(areas) if !areas.is_empty() => areas,
            Ok(_) => DEFAULT_AREAS.iter().map(|s| s.to_string()).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default areas");
                DEFAULT_AREAS.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    pub async fn catalog_users(&self) -> Vec<CatalogUser> {
        match self.store.read_users().await {
            Ok(users) if !users.is_empty() => users,
            Ok(_) => DEFAULT_USERS.iter().map(|n| CatalogUser::named(n)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default catalog users");
                DEFAULT_USERS.iter().map(|n| CatalogUser::named(n)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sheets::store::MockTabularStore;

    fn seeded() -> Vec<Property> {
        vec![
            Property {
                id: "a".into(),
                emirate: "Dubai".into(),
                area: "Dubai Marina".into(),
                bedrooms: "2".into(),
                total_price_aed: "1500000".into(),
                size_value: "1200".into(),
                title_en: "Marina skyline apartment".into(),
                amenities_basic: "Balcony, Central A/C".into(),
                amenities_nearby: "Metro, School".into(),
                contacts_json: r#"[{"name":"Emaar Properties"}]"#.into(),
                ..Property::default()
            },
            Property {
                id: "b".into(),
                emirate: "Dubai".into(),
                area: "Business Bay".into(),
                bedrooms: "3".into(),
                total_price_aed: "not-a-number".into(),
                title_en: "Canal view".into(),
                notes: "needs renovation".into(),
                ..Property::default()
            },
            Property {
                id: "c".into(),
                emirate: "Abu Dhabi".into(),
                area: "Al Reem".into(),
                bedrooms: "2".into(),
                total_price_aed: "900000".into(),
                contacts_json: "{broken".into(),
                ..Property::default()
            },
        ]
    }

    #[test]
    fn every_match_satisfies_every_criterion() {
        let filter = PropertyFilter {
            emirate: Some("Dubai".into()),
            bedrooms: Some("2".into()),
            ..PropertyFilter::default()
        };
        let all = seeded();
        let matched: Vec<_> = all.iter().filter(|p| matches(p, &filter)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
        for p in &matched {
            assert_eq!(p.emirate, "Dubai");
            assert_eq!(p.bedrooms, "2");
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = PropertyFilter::default();
        assert!(seeded().iter().all(|p| matches(p, &filter)));
    }

    #[test]
    fn unparseable_price_counts_as_zero() {
        let all = seeded();
        let filter = PropertyFilter {
            min_price: Some("1".into()),
            ..PropertyFilter::default()
        };
        // "not-a-number" reads as 0 and falls below any positive minimum.
        assert!(!matches(&all[1], &filter));
        let filter = PropertyFilter {
            max_price: Some("1000000".into()),
            ..PropertyFilter::default()
        };
        assert!(matches(&all[1], &filter));
    }

    #[test]
    fn keyword_is_case_insensitive_across_text_fields() {
        let all = seeded();
        let filter = PropertyFilter {
            keyword: Some("RENOVATION".into()),
            ..PropertyFilter::default()
        };
        assert!(!matches(&all[0], &filter));
        assert!(matches(&all[1], &filter));
    }

    #[test]
    fn amenities_require_all_requested() {
        let all = seeded();
        let filter = PropertyFilter {
            amenities: Some("balcony,metro".into()),
            ..PropertyFilter::default()
        };
        assert!(matches(&all[0], &filter));
        let filter = PropertyFilter {
            amenities: Some("balcony,pool".into()),
            ..PropertyFilter::default()
        };
        assert!(!matches(&all[0], &filter));
    }

    #[test]
    fn developer_name_searches_contacts_and_skips_broken_json() {
        let all = seeded();
        let filter = PropertyFilter {
            developer_name: Some("emaar".into()),
            ..PropertyFilter::default()
        };
        assert!(matches(&all[0], &filter));
        // Unparseable contacts blob: the criterion is skipped, not failed.
        assert!(matches(&all[2], &filter));
    }

    #[tokio::test]
    async fn filtered_list_is_subset_of_unfiltered() {
        let store = Arc::new(crate::sheets::MemoryStore::with_properties(seeded()));
        let service = PropertyService::new(store);
        let unfiltered = service.list(&PropertyFilter::default()).await.unwrap();
        let filter = PropertyFilter {
            emirate: Some("Dubai".into()),
            ..PropertyFilter::default()
        };
        let filtered = service.list(&filter).await.unwrap();
        assert!(filtered.len() <= unfiltered.len());
        for p in &filtered {
            assert!(unfiltered.iter().any(|u| u.id == p.id));
            assert_eq!(p.emirate, "Dubai");
        }
    }

    #[tokio::test]
    async fn areas_degrade_to_defaults_on_store_failure() {
        let mut store = MockTabularStore::new();
        store
            .expect_read_areas()
            .returning(|| Err(Error::Sheet("tab missing".into())));
        store.expect_read_users().returning(|| Ok(Vec::new()));
        let service = PropertyService::new(Arc::new(store));

        let areas = service.areas().await;
        assert_eq!(areas, DEFAULT_AREAS.map(String::from).to_vec());

        let users = service.catalog_users().await;
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, DEFAULT_USERS.to_vec());
    }
}
