use crate::models::property::Property;
use serde_json::Value as JsonValue;

/// Number of columns in the Properties tab (A through AQ). The column order
/// below is a compatibility contract with the sheet; do not reorder.
pub const PROPERTY_COLUMNS: usize = 43;


fn cell(row: &[JsonValue], idx: usize) -> String {
    match row.get(idx) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn row_to_property(row: &[JsonValue]) -> Property {
    Property {
        id: cell(row, 0),
        created_at: cell(row, 1),
        updated_at: cell(row, 2),
        listing_user: cell(row, 3),
        emirate: cell(row, 4),
        offering_type: cell(row, 5),
        finishing_type: cell(row, 6),
        completion_status: cell(row, 7),
        deal_type: cell(row, 8),
        property_type: cell(row, 9),
        property_sub_type: cell(row, 10),
        bedrooms: cell(row, 11),
        bathrooms: cell(row, 12),
        parking: cell(row, 13),
        furnish_status: cell(row, 14),
        facing: cell(row, 15),
        property_age_years: cell(row, 16),
        size_value: cell(row, 17),
        size_unit: cell(row, 18),
        title_en: cell(row, 19),
        title_ar: cell(row, 20),
        about_en: cell(row, 21),
        about_ar: cell(row, 22),
        unit_number: cell(row, 23),
        notes: cell(row, 24),
        total_price_aed: cell(row, 25),
        down_payment_aed: cell(row, 26),
        cheques_count: cell(row, 27),
        hide_price: cell(row, 28).eq_ignore_ascii_case("true"),
        area: cell(row, 29),
        building_or_project: cell(row, 30),
        location_free_text: cell(row, 31),
        geo_lat: cell(row, 32),
        geo_lng: cell(row, 33),
        permit_number: cell(row, 34),
        issuing_client_license_number: cell(row, 35),
        contacts_json: cell(row, 36),
        amenities_basic: cell(row, 37),
        amenities_featured: cell(row, 38),
        amenities_nearby: cell(row, 39),
        google_drive_link: cell(row, 41),
        lead_rat_link: cell(row, 42),
    }
}

pub fn property_to_row(property: &Property) -> Vec<JsonValue> {
    let hide_price = if property.hide_price { "TRUE" } else { "FALSE" };
    let row: Vec<JsonValue> = vec![
        property.id.clone().into(),
        property.created_at.clone().into(),
        property.updated_at.clone().into(),
        property.listing_user.clone().into(),
        property.emirate.clone().into(),
        property.offering_type.clone().into(),
        property.finishing_type.clone().into(),
        property.completion_status.clone().into(),
        property.deal_type.clone().into(),
        property.property_type.clone().into(),
        property.property_sub_type.clone().into(),
        property.bedrooms.clone().into(),
        property.bathrooms.clone().into(),
        property.parking.clone().into(),
        property.furnish_status.clone().into(),
        property.facing.clone().into(),
        property.property_age_years.clone().into(),
        property.size_value.clone().into(),
        property.size_unit.clone().into(),
        property.title_en.clone().into(),
        property.title_ar.clone().into(),
        property.about_en.clone().into(),
        property.about_ar.clone().into(),
        property.unit_number.clone().into(),
        property.notes.clone().into(),
        property.total_price_aed.clone().into(),
        property.down_payment_aed.clone().into(),
        property.cheques_count.clone().into(),
        hide_price.into(),
        property.area.clone().into(),
        property.building_or_project.clone().into(),
        property.location_free_text.clone().into(),
        property.geo_lat.clone().into(),
        property.geo_lng.clone().into(),
        property.permit_number.clone().into(),
        property.issuing_client_license_number.clone().into(),
        property.contacts_json.clone().into(),
        property.amenities_basic.clone().into(),
        property.amenities_featured.clone().into(),
        property.amenities_nearby.clone().into(),
        // Reserved "Reference Id" column, always written blank.
        JsonValue::String(String::new()),
        property.google_drive_link.clone().into(),
        property.lead_rat_link.clone().into(),
    ];
    debug_assert_eq!(row.len(), PROPERTY_COLUMNS);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_layout_is_stable() {
        let property = Property {
            id: "p-1".into(),
            title_en: "Marina view".into(),
            hide_price: true,
            contacts_json: r#"[{"name":"Emaar"}]"#.into(),
            google_drive_link: "https://drive/x".into(),
            lead_rat_link: "https://leadrat/x".into(),
            ..Property::default()
        };
        let row = property_to_row(&property);
        assert_eq!(row.len(), PROPERTY_COLUMNS);
        assert_eq!(row[0], json!("p-1"));
        assert_eq!(row[19], json!("Marina view"));
        assert_eq!(row[28], json!("TRUE"));
        assert_eq!(row[36], json!(r#"[{"name":"Emaar"}]"#));
        assert_eq!(row[40], json!(""));
        assert_eq!(row[41], json!("https://drive/x"));
        assert_eq!(row[42], json!("https://leadrat/x"));
    }

    #[test]
    fn short_and_numeric_rows_read_back() {
        // Sheets trims trailing empty cells and may return numbers unquoted.
        let row = vec![
            json!("p-2"),
            json!("2026-01-01T00:00:00Z"),
            json!("2026-01-02T00:00:00Z"),
            json!("Broker 1"),
        ];
        let property = row_to_property(&row);
        assert_eq!(property.id, "p-2");
        assert_eq!(property.listing_user, "Broker 1");
        assert_eq!(property.total_price_aed, "");
        assert!(!property.hide_price);

        let mut priced = vec![json!(""); PROPERTY_COLUMNS];
        priced[0] = json!("p-3");
        priced[25] = json!(1250000);
        priced[28] = json!("true");
        let property = row_to_property(&priced);
        assert_eq!(property.total_price_aed, "1250000");
        assert!(property.hide_price);
    }
}
