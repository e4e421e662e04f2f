// Review - text a user wrote about a place

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::new("place_id", FieldType::String)
            .with_description("Id of the reviewed place"),
        AttributeDefinition::new("user_id", FieldType::String)
            .with_description("Id of the user who wrote the review"),
        AttributeDefinition::new("text", FieldType::String).with_description("The review itself"),
    ]
}
