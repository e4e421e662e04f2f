// HBNB Console - Core Library
// Entity models, JSON file storage and the command interpreter

pub mod attributes;
pub mod config;
pub mod console;
pub mod entities;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use attributes::{AttributeDefinition, AttributeRegistry, FieldType, PROTECTED_FIELDS};
pub use config::Config;
pub use console::{Command, CommandError, Console, Flow, LineEditor, ReadResult, ScriptedEditor};
pub use entities::{ClassKind, Entity, CLASS_MARKER, DATE_ISO8601_FORMAT};
pub use storage::FileStorage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
