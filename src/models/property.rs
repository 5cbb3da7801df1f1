use serde::{Deserialize, Serialize};

/// One listing row from the Properties sheet. Everything is kept as the
/// sheet stores it: free text, numbers-as-strings, comma-joined amenity
/// lists and a JSON blob for contacts. Numeric interpretation happens only
/// at filter time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
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
    pub property_age_years: String,
    pub size_value: String,
    pub size_unit: String,
    pub title_en: String,
    pub title_ar: String,
    pub about_en: String,
    pub about_ar: String,
    pub unit_number: String,
    pub notes: String,
    pub total_price_aed: String,
    pub down_payment_aed: String,
    pub cheques_count: String,
    pub hide_price: bool,
    pub area: String,
    pub building_or_project: String,
    pub location_free_text: String,
    pub geo_lat: String,
    pub geo_lng: String,
    pub permit_number: String,
    pub issuing_client_license_number: String,
    pub contacts_json: String,
    pub amenities_basic: String,
    pub amenities_featured: String,
    pub amenities_nearby: String,
    pub google_drive_link: String,
    pub lead_rat_link: String,
}
