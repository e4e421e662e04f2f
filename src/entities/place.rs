// 🏠 Place - a rentable listing
//
// The only class with non-string fields: counts and price are integers,
// coordinates are floats and `amenity_ids` is a list of Amenity ids.

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![
        // ====================================================================
        // REFERENCES
        // ====================================================================
        AttributeDefinition::new("city_id", FieldType::String)
            .with_description("Id of the city the place is in"),
        AttributeDefinition::new("user_id", FieldType::String)
            .with_description("Id of the owner"),
        // ====================================================================
        // DESCRIPTIVE
        // ====================================================================
        AttributeDefinition::new("name", FieldType::String),
        AttributeDefinition::new("description", FieldType::String),
        // ====================================================================
        // CAPACITY & PRICE
        // ====================================================================
        AttributeDefinition::new("number_rooms", FieldType::Integer),
        AttributeDefinition::new("number_bathrooms", FieldType::Integer),
        AttributeDefinition::new("max_guest", FieldType::Integer),
        AttributeDefinition::new("price_by_night", FieldType::Integer)
            .with_description("Nightly price in whole currency units"),
        // ====================================================================
        // LOCATION
        // ====================================================================
        AttributeDefinition::new("latitude", FieldType::Float),
        AttributeDefinition::new("longitude", FieldType::Float),
        AttributeDefinition::new("amenity_ids", FieldType::StringList)
            .with_description("Ids of the amenities the place offers"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_field_types() {
        let fields = fields();
        let integers: Vec<&str> = fields
            .iter()
            .filter(|f| f.type_ == FieldType::Integer)
            .map(|f| f.name.as_str())
            .collect();

        assert_eq!(
            integers,
            vec!["number_rooms", "number_bathrooms", "max_guest", "price_by_night"]
        );
        assert!(fields.iter().any(|f| f.name == "amenity_ids" && f.type_ == FieldType::StringList));
    }
}
