// 👤 User - an account holder who owns places and writes reviews

use crate::attributes::{AttributeDefinition, FieldType};

pub fn fields() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::new("email", FieldType::String)
            .with_description("The user's email address"),
        AttributeDefinition::new("password", FieldType::String)
            .with_description("The user's password"),
        AttributeDefinition::new("first_name", FieldType::String)
            .with_description("The user's first name"),
        AttributeDefinition::new("last_name", FieldType::String)
            .with_description("The user's last name"),
    ]
}
