use crate::models::property::Property;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Query parameters for the property list. Every supplied criterion must
/// hold for a row to match (logical AND). `amenities` is comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFilter {
    pub emirate: Option<String>,
    pub area: Option<String>,
    pub offering_type: Option<String>,
    pub deal_type: Option<String>,
    pub property_type: Option<String>,
    pub property_sub_type: Option<String>,
    pub completion_status: Option<String>,
    pub finishing_type: Option<String>,
    pub furnish_status: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub parking: Option<String>,
    pub facing: Option<String>,
    pub listing_user: Option<String>,
    pub unit_number: Option<String>,
    pub permit_number: Option<String>,
    pub cheques_count: Option<String>,
    pub developer_name: Option<String>,
    pub keyword: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_down_payment: Option<String>,
    pub max_down_payment: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub amenities: Option<String>,
}

/// Create/update body. The wire names mirror the listing form, which is why
/// a few differ from the stored column names (propertyAge, totalPrice,
/// downPayment).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPayload {
    pub created_at: Option<String>,
    pub listing_user: String,
    pub emirate: String,
    pub offering_type: String,
    pub finishing_type: String,
    pub completion_status: String,
    pub deal_type: String,
    pub property_type: String,
    pub property_sub_type: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub parking: String,
    pub furnish_status: String,
    pub facing: String,
    pub property_age: String,
    pub size_value: String,
    pub size_unit: String,
    pub title_en: String,
    pub title_ar: String,
    pub about_en: String,
    pub about_ar: String,
    pub unit_number: String,
    pub notes: String,
    pub total_price: String,
    pub down_payment: String,
    pub cheques_count: String,
    pub hide_price: bool,
    pub area: String,
    pub building_or_project: String,
    pub location_free_text: String,
    pub geo_lat: String,
    pub geo_lng: String,
    pub permit_number: String,
    pub issuing_client_license_number: String,
    pub contacts: Option<JsonValue>,
    pub amenities_basic: Option<JsonValue>,
    pub amenities_featured: Option<JsonValue>,
    pub amenities_nearby: Option<JsonValue>,
    pub google_drive_link: String,
    pub lead_rat_link: String,
}

fn join_list(value: &Option<JsonValue>) -> String {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        Some(JsonValue::String(s)) => s.clone(),
        _ => String::new(),
    }
}

impl PropertyPayload {
    pub fn into_property(self, id: String, created_at: String, updated_at: String) -> Property {
        let contacts_json = match &self.contacts {
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "[]".to_string(),
        };
        Property {
            id,
            created_at,
            updated_at,
            listing_user: self.listing_user,
            emirate: self.emirate,
            offering_type: self.offering_type,
            finishing_type: self.finishing_type,
            completion_status: self.completion_status,
            deal_type: self.deal_type,
            property_type: self.property_type,
            property_sub_type: self.property_sub_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            parking: self.parking,
            furnish_status: self.furnish_status,
            facing: self.facing,
            property_age_years: self.property_age,
            size_value: self.size_value,
            size_unit: self.size_unit,
            title_en: self.title_en,
            title_ar: self.title_ar,
            about_en: self.about_en,
            about_ar: self.about_ar,
            unit_number: self.unit_number,
            notes: self.notes,
            total_price_aed: self.total_price,
            down_payment_aed: self.down_payment,
            cheques_count: self.cheques_count,
            hide_price: self.hide_price,
            area: self.area,
            building_or_project: self.building_or_project,
            location_free_text: self.location_free_text,
            geo_lat: self.geo_lat,
            geo_lng: self.geo_lng,
            permit_number: self.permit_number,
            issuing_client_license_number: self.issuing_client_license_number,
            contacts_json,
            amenities_basic: join_list(&self.amenities_basic),
            amenities_featured: join_list(&self.amenities_featured),
            amenities_nearby: join_list(&self.amenities_nearby),
            google_drive_link: self.google_drive_link,
            lead_rat_link: self.lead_rat_link,
        }
    }
}
