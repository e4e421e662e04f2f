// 🏷️ Attribute Registry - Field schema for every entity class
// Each class declares which fields it owns and what kind of value they hold.
// The update command consults this table instead of guessing from the stored value.

use crate::entities::ClassKind;
use serde_json::Value;
use std::collections::HashMap;

/// Fields that belong to every entity and can never be changed through `update`
pub const PROTECTED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

// ============================================================================
// FIELD TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free text (names, emails, foreign keys)
    String,
    /// Whole number (room counts, prices)
    Integer,
    /// Floating point (coordinates)
    Float,
    /// List of strings (amenity ids)
    StringList,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::StringList => "string list",
        }
    }

    /// Convert raw command text into a JSON value of this type.
    ///
    /// Coercion never fails: text that does not parse is kept as a string.
    pub fn coerce(&self, raw: &str) -> Value {
        match self {
            FieldType::String => Value::String(raw.to_string()),
            FieldType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            FieldType::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            FieldType::StringList => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(items) => Value::from(items),
                Err(_) => Value::String(raw.to_string()),
            },
        }
    }
}

// ============================================================================
// ATTRIBUTE DEFINITION
// ============================================================================

#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    /// Field name as stored in the JSON record (e.g. "state_id")
    pub name: String,

    /// Kind of value this field holds
    pub type_: FieldType,

    /// What does this field mean?
    pub description: String,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        AttributeDefinition {
            name: name.into(),
            type_,
            description: String::new(),
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

// ============================================================================
// ATTRIBUTE REGISTRY
// ============================================================================

/// Catalog of declared fields, keyed by class
///
/// Fields that are not declared for a class are still accepted by `update`;
/// they are stored as plain strings.
pub struct AttributeRegistry {
    fields: HashMap<ClassKind, Vec<AttributeDefinition>>,
}

impl AttributeRegistry {
    /// Create a registry holding the field table of every known class
    pub fn new() -> Self {
        let mut registry = AttributeRegistry {
            fields: HashMap::new(),
        };

        for kind in ClassKind::ALL {
            registry
                .fields
                .insert(kind, crate::entities::declared_fields(kind));
        }

        registry
    }

    /// Get a declared field of a class by name
    pub fn get(&self, kind: ClassKind, name: &str) -> Option<&AttributeDefinition> {
        self.fields
            .get(&kind)
            .and_then(|fields| fields.iter().find(|attr| attr.name == name))
    }

    /// Type used when a value is assigned to `name` on `kind`
    pub fn field_type(&self, kind: ClassKind, name: &str) -> FieldType {
        self.get(kind, name)
            .map(|attr| attr.type_)
            .unwrap_or(FieldType::String)
    }

    /// All declared fields of a class
    pub fn fields_of(&self, kind: ClassKind) -> &[AttributeDefinition] {
        self.fields.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count declared fields across every class
    pub fn count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn is_protected(name: &str) -> bool {
        PROTECTED_FIELDS.contains(&name)
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_declared_fields() {
        let registry = AttributeRegistry::new();

        assert!(registry.fields_of(ClassKind::BaseModel).is_empty());
        assert_eq!(registry.fields_of(ClassKind::User).len(), 4);
        assert_eq!(registry.fields_of(ClassKind::Place).len(), 11);
        assert!(registry.count() > 0, "Registry should have class fields");
    }

    #[test]
    fn test_field_type_lookup() {
        let registry = AttributeRegistry::new();

        assert_eq!(registry.field_type(ClassKind::Place, "max_guest"), FieldType::Integer);
        assert_eq!(registry.field_type(ClassKind::Place, "latitude"), FieldType::Float);
        assert_eq!(registry.field_type(ClassKind::Place, "amenity_ids"), FieldType::StringList);
        assert_eq!(registry.field_type(ClassKind::City, "state_id"), FieldType::String);

        // Undeclared fields fall back to strings
        assert_eq!(registry.field_type(ClassKind::State, "nickname"), FieldType::String);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(FieldType::Integer.coerce("4"), Value::from(4));
        assert_eq!(FieldType::Integer.coerce("four"), Value::from("four"));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(FieldType::Float.coerce("37.77"), Value::from(37.77));
        assert_eq!(FieldType::Float.coerce("north"), Value::from("north"));
    }

    #[test]
    fn test_coerce_string_list() {
        assert_eq!(
            FieldType::StringList.coerce(r#"["a", "b"]"#),
            Value::from(vec!["a", "b"])
        );
        assert_eq!(FieldType::StringList.coerce("a,b"), Value::from("a,b"));
    }

    #[test]
    fn test_declared_field_details() {
        let registry = AttributeRegistry::new();
        let amenity_ids = registry.get(ClassKind::Place, "amenity_ids").unwrap();

        assert_eq!(amenity_ids.type_.as_str(), "string list");
        assert!(!amenity_ids.description.is_empty());
        assert!(registry.get(ClassKind::Amenity, "capacity").is_none());
    }

    #[test]
    fn test_protected_fields() {
        assert!(AttributeRegistry::is_protected("id"));
        assert!(AttributeRegistry::is_protected("created_at"));
        assert!(AttributeRegistry::is_protected("updated_at"));
        assert!(!AttributeRegistry::is_protected("name"));
    }
}
