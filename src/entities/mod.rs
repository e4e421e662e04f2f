// Entity Models
// Every stored object is an `Entity`: identity (UUID), two timestamps, and a
// bag of class-specific attributes. The class is a closed `ClassKind` tag.
//
// Each class file declares the fields that class owns; the rest of the
// behaviour (construction, rehydration, serialization) is shared here.

pub mod base_model;
pub mod user;
pub mod state;
pub mod city;
pub mod amenity;
pub mod place;
pub mod review;

use crate::attributes::AttributeDefinition;
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Format used for `created_at` / `updated_at` in stored records
pub const DATE_ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Marker field naming the class of a stored record
pub const CLASS_MARKER: &str = "__class__";

// ============================================================================
// CLASS KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ClassKind {
    /// Every class the console knows, in declaration order
    pub const ALL: [ClassKind; 7] = [
        ClassKind::BaseModel,
        ClassKind::User,
        ClassKind::State,
        ClassKind::City,
        ClassKind::Amenity,
        ClassKind::Place,
        ClassKind::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::BaseModel => "BaseModel",
            ClassKind::User => "User",
            ClassKind::State => "State",
            ClassKind::City => "City",
            ClassKind::Amenity => "Amenity",
            ClassKind::Place => "Place",
            ClassKind::Review => "Review",
        }
    }

    /// Resolve a class name through the lookup table (exact, case-sensitive)
    pub fn from_name(name: &str) -> Option<ClassKind> {
        ClassKind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Key prefix shared by every stored object of this class ("State.")
    pub fn key_prefix(&self) -> String {
        format!("{}.", self.as_str())
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field table for a class
pub fn declared_fields(kind: ClassKind) -> Vec<AttributeDefinition> {
    match kind {
        ClassKind::BaseModel => base_model::fields(),
        ClassKind::User => user::fields(),
        ClassKind::State => state::fields(),
        ClassKind::City => city::fields(),
        ClassKind::Amenity => amenity::fields(),
        ClassKind::Place => place::fields(),
        ClassKind::Review => review::fields(),
    }
}

// ============================================================================
// ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: ClassKind,

    /// Stable identity (UUID v4) - assigned once, never changes
    pub id: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,

    /// Class-specific fields (name, email, state_id, ...)
    pub attributes: BTreeMap<String, Value>,
}

impl Entity {
    /// Create a fresh entity with a new UUID and both timestamps set to now
    pub fn new(kind: ClassKind) -> Self {
        let timestamp = now();

        Entity {
            kind,
            id: uuid::Uuid::new_v4().to_string(),
            created_at: timestamp,
            updated_at: timestamp,
            attributes: BTreeMap::new(),
        }
    }

    /// Rehydrate an entity from a stored record
    ///
    /// The class comes from the `__class__` marker. Every other field is copied
    /// verbatim; the two timestamps are parsed back from ISO-8601 text.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let class_name = map
            .get(CLASS_MARKER)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("record has no {} marker", CLASS_MARKER))?;
        let kind = ClassKind::from_name(class_name)
            .ok_or_else(|| anyhow!("unknown class in record: {}", class_name))?;

        Self::from_map_as(kind, map)
    }

    /// Rehydrate a record as `kind`, ignoring any class marker it carries
    fn from_map_as(kind: ClassKind, map: &Map<String, Value>) -> Result<Self> {
        let id = map
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("record has no string id"))?
            .to_string();

        let created_at = parse_timestamp(map, "created_at")?;
        let updated_at = parse_timestamp(map, "updated_at")?;

        let attributes = map
            .iter()
            .filter(|(key, _)| {
                !matches!(key.as_str(), CLASS_MARKER | "id" | "created_at" | "updated_at")
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Entity {
            kind,
            id,
            created_at,
            updated_at,
            attributes,
        })
    }

    /// Composite registry key: "ClassName.id"
    pub fn key(&self) -> String {
        format!("{}.{}", self.kind, self.id)
    }

    /// Plain field map with ISO-8601 timestamps and the `__class__` marker
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.field_map();
        map.insert(CLASS_MARKER.to_string(), Value::from(self.kind.as_str()));
        map
    }

    /// Mark the entity as modified now
    pub fn touch(&mut self) {
        // Clock skew must never move updated_at before created_at
        self.updated_at = now().max(self.created_at);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.attributes.insert(field.into(), value);
    }

    fn field_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("created_at".to_string(), Value::from(format_timestamp(&self.created_at)));
        map.insert("updated_at".to_string(), Value::from(format_timestamp(&self.updated_at)));
        for (key, value) in &self.attributes {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

/// "[ClassName] (id) {field map}"
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {}",
            self.kind,
            self.id,
            Value::Object(self.field_map())
        )
    }
}

/// Current time at the precision stored on disk (microseconds)
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DATE_ISO8601_FORMAT).to_string()
}

fn parse_timestamp(map: &Map<String, Value>, field: &str) -> Result<NaiveDateTime> {
    let raw = map
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("record has no string {}", field))?;

    // %.f accepts any number of fractional digits, including none
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("invalid {} timestamp: {}", field, raw))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_class_kind_lookup() {
        for kind in ClassKind::ALL {
            assert_eq!(ClassKind::from_name(kind.as_str()), Some(kind));
        }

        assert_eq!(ClassKind::from_name("Country"), None);
        assert_eq!(ClassKind::from_name("user"), None, "Lookup is case-sensitive");
    }

    #[test]
    fn test_fresh_entity() {
        let entity = Entity::new(ClassKind::State);

        assert!(uuid::Uuid::parse_str(&entity.id).is_ok());
        assert_eq!(entity.created_at, entity.updated_at);
        assert!(entity.attributes.is_empty());
        assert_eq!(entity.key(), format!("State.{}", entity.id));
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Entity::new(ClassKind::User);
        let b = Entity::new(ClassKind::User);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_to_map_shape() {
        let mut entity = Entity::new(ClassKind::City);
        entity.set("name", json!("Napa"));

        let map = entity.to_map();

        assert_eq!(map["__class__"], json!("City"));
        assert_eq!(map["id"], json!(entity.id));
        assert_eq!(map["name"], json!("Napa"));
        assert!(map["created_at"].is_string());
        assert!(map["updated_at"].is_string());
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let mut entity = Entity::new(ClassKind::Place);
        entity.set("max_guest", json!(4));
        entity.set("latitude", json!(37.5));
        entity.set("amenity_ids", json!(["a1", "a2"]));

        let first = entity.to_map();
        let restored = Entity::from_map(&first).unwrap();
        let second = restored.to_map();

        assert_eq!(first, second);
        assert_eq!(restored, entity);
    }

    #[test]
    fn test_from_map_accepts_missing_microseconds() {
        let record = json!({
            "__class__": "Review",
            "id": "abc",
            "created_at": "2024-06-01T12:00:00",
            "updated_at": "2024-06-01T12:00:00.250000",
            "text": "Great stay"
        });

        let entity = Entity::from_map(record.as_object().unwrap()).unwrap();

        assert_eq!(entity.kind, ClassKind::Review);
        assert_eq!(entity.get("text"), Some(&json!("Great stay")));
        assert!(entity.updated_at > entity.created_at);
    }

    #[test]
    fn test_from_map_rejects_bad_records() {
        let no_class = json!({"id": "x", "created_at": "2024-06-01T12:00:00", "updated_at": "2024-06-01T12:00:00"});
        assert!(Entity::from_map(no_class.as_object().unwrap()).is_err());

        let unknown = json!({"__class__": "Country", "id": "x", "created_at": "2024-06-01T12:00:00", "updated_at": "2024-06-01T12:00:00"});
        assert!(Entity::from_map(unknown.as_object().unwrap()).is_err());

        let bad_time = json!({"__class__": "User", "id": "x", "created_at": "yesterday", "updated_at": "2024-06-01T12:00:00"});
        assert!(Entity::from_map(bad_time.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_display_string() {
        let entity = Entity::new(ClassKind::Amenity);
        let shown = entity.to_string();

        assert!(shown.starts_with(&format!("[Amenity] ({}) {{", entity.id)));
        assert!(shown.contains(&entity.id));
        assert!(!shown.contains("__class__"));
    }

    #[test]
    fn test_touch_moves_updated_at_forward() {
        let mut entity = Entity::new(ClassKind::BaseModel);
        let before = entity.updated_at;

        entity.touch();

        assert!(entity.updated_at >= before);
        assert!(entity.updated_at >= entity.created_at);
    }
}
