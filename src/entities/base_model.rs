// BaseModel - the bare entity: identity and timestamps only

use crate::attributes::AttributeDefinition;

/// BaseModel declares no fields of its own
pub fn fields() -> Vec<AttributeDefinition> {
    Vec::new()
}
