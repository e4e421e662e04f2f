// City - belongs to a State through `state_id`
//
// `state_id` is a plain string reference; nothing checks that the state exists.

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::new("state_id", FieldType::String)
            .with_description("Id of the state the city is located in"),
        AttributeDefinition::new("name", FieldType::String).with_description("Name of the city"),
    ]
}
