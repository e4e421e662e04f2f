// Amenity - something a place can offer (wifi, pool, ...)

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![AttributeDefinition::new("name", FieldType::String).with_description("Name of the amenity")]
}
