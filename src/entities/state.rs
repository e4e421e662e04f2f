// State - top-level region that cities belong to

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![AttributeDefinition::new("name", FieldType::String).with_description("Name of the state")]
}
