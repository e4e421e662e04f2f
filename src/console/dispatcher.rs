// 🧭 Command Dispatcher - Executes parsed commands against the storage
//
// Every handler walks the same validation ladder (class → id → instance →
// attribute → value) and reports the first failure as a printed message.
// Nothing the user types can make the dispatcher return an error; only
// failing to write the output does.

use crate::attributes::AttributeRegistry;
use crate::console::command::Command;
use crate::console::editor::{LineEditor, ReadResult};
use crate::entities::{ClassKind, Entity};
use crate::storage::FileStorage;
use anyhow::Result;
use serde_json::{Map, Value};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, error};

// ============================================================================
// ERRORS
// ============================================================================

/// User-facing failures; the `Display` text is exactly what gets printed
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** could not save: {0} **")]
    SaveFailed(String),
}

/// What the read loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// ============================================================================
// HELP TEXT
// ============================================================================

const HELP_TOPICS: [(&str, &str); 9] = [
    ("EOF", "Exit the program on end of input (Ctrl+D)"),
    ("all", "Print every instance, or every instance of a class\nUsage: all [<class>]"),
    ("count", "Print the number of instances of a class\nUsage: count <class>"),
    ("create", "Create a new instance, save it and print its id\nUsage: create <class>"),
    ("destroy", "Delete an instance\nUsage: destroy <class> <id>"),
    (
        "help",
        "List available commands with \"help\", detailed help with \"help <command>\"\nor the fields of a class with \"help <class>\"",
    ),
    ("quit", "Quit command to exit the program"),
    ("show", "Print the string representation of an instance\nUsage: show <class> <id>"),
    (
        "update",
        "Set one attribute of an instance and save it\nUsage: update <class> <id> <attribute> \"<value>\"",
    ),
];

// ============================================================================
// CONSOLE
// ============================================================================

/// The command interpreter
///
/// Owns the storage for the session; `into_storage` hands it back for the
/// final flush.
pub struct Console<W: Write> {
    storage: FileStorage,
    attributes: AttributeRegistry,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(storage: FileStorage, out: W) -> Self {
        Console {
            storage,
            attributes: AttributeRegistry::new(),
            out,
        }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_storage(self) -> FileStorage {
        self.storage
    }

    /// Read and execute lines until `quit` or end of input
    pub fn run<E: LineEditor>(&mut self, editor: &mut E, prompt: &str) -> Result<()> {
        loop {
            let flow = match editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history(&line);
                    }
                    self.execute(&line)?
                }
                ReadResult::Interrupted => {
                    writeln!(self.out)?;
                    Flow::Continue
                }
                ReadResult::Eof => self.dispatch(Command::Eof)?,
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Parse and execute one line
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = Command::parse(line);
        debug!(?command, "dispatching");
        self.dispatch(command)
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        let outcome = match command {
            Command::Empty => Ok(Vec::new()),
            Command::Quit => return Ok(Flow::Exit),
            Command::Eof => {
                writeln!(self.out)?;
                return Ok(Flow::Exit);
            }
            Command::Help { topic } => Ok(self.help(topic.as_deref())),
            Command::Create { class } => self.create(class.as_deref()),
            Command::Show { class, id } => self.show(class.as_deref(), id.as_deref()),
            Command::Destroy { class, id } => self.destroy(class.as_deref(), id.as_deref()),
            Command::All { class } => self.all(class.as_deref()),
            Command::Update {
                class,
                id,
                attribute,
                value,
            } => self.update(
                class.as_deref(),
                id.as_deref(),
                attribute.as_deref(),
                value.as_deref(),
            ),
            Command::UpdateMany { class, id, values } => self.update_many(&class, &id, &values),
            Command::Count { class } => self.count(class.as_deref()),
            Command::Unknown(line) => Ok(vec![format!("*** Unknown syntax: {}", line)]),
        };

        match outcome {
            Ok(lines) => {
                for line in lines {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Err(e) => writeln!(self.out, "{}", e)?,
        }

        Ok(Flow::Continue)
    }

    // ========================================================================
    // COMMAND HANDLERS
    // ========================================================================

    fn create(&mut self, class: Option<&str>) -> Result<Vec<String>, CommandError> {
        let kind = resolve_class(class)?;
        let entity = Entity::new(kind);
        let id = entity.id.clone();

        let key = self.storage.insert(entity);
        if let Err(e) = self.persist(&key) {
            // Never announced, so it must not linger in memory either
            self.storage.remove(&key);
            return Err(e);
        }

        Ok(vec![id])
    }

    fn show(&self, class: Option<&str>, id: Option<&str>) -> Result<Vec<String>, CommandError> {
        let key = self.resolve_instance(class, id)?;
        self.storage
            .get(&key)
            .map(|entity| vec![entity.to_string()])
            .ok_or(CommandError::NoInstanceFound)
    }

    fn destroy(&mut self, class: Option<&str>, id: Option<&str>) -> Result<Vec<String>, CommandError> {
        let key = self.resolve_instance(class, id)?;
        let removed = self.storage.all_mut().remove(&key);

        if let Err(e) = self.storage.save() {
            // The file still holds the record; keep memory in step with it
            if let Some(entity) = removed {
                self.storage.insert(entity);
            }
            return Err(save_failed(e));
        }
        Ok(Vec::new())
    }

    fn all(&self, class: Option<&str>) -> Result<Vec<String>, CommandError> {
        match class {
            None => Ok(self.storage.all().values().map(Entity::to_string).collect()),
            Some(name) => {
                let kind = ClassKind::from_name(name).ok_or(CommandError::ClassDoesNotExist)?;
                Ok(self.storage.of_kind(kind).map(Entity::to_string).collect())
            }
        }
    }

    fn update(
        &mut self,
        class: Option<&str>,
        id: Option<&str>,
        attribute: Option<&str>,
        value: Option<&str>,
    ) -> Result<Vec<String>, CommandError> {
        let key = self.resolve_instance(class, id)?;
        let attribute = attribute.ok_or(CommandError::AttributeNameMissing)?;
        let value = value.ok_or(CommandError::ValueMissing)?;

        if AttributeRegistry::is_protected(attribute) {
            debug!(attribute, "refusing to update protected field");
            return Ok(Vec::new());
        }

        self.assign(&key, attribute, value);
        self.persist(&key)?;
        Ok(Vec::new())
    }

    fn update_many(
        &mut self,
        class: &str,
        id: &str,
        values: &Map<String, Value>,
    ) -> Result<Vec<String>, CommandError> {
        let key = self.resolve_instance(Some(class), Some(id))?;

        for (attribute, value) in values {
            if AttributeRegistry::is_protected(attribute) {
                continue;
            }
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.assign(&key, attribute, &raw);
        }

        self.persist(&key)?;
        Ok(Vec::new())
    }

    fn count(&self, class: Option<&str>) -> Result<Vec<String>, CommandError> {
        let kind = resolve_class(class)?;
        Ok(vec![self.storage.count(kind).to_string()])
    }

    fn help(&self, topic: Option<&str>) -> Vec<String> {
        let Some(name) = topic else {
            let names: Vec<&str> = HELP_TOPICS.iter().map(|(name, _)| *name).collect();
            return vec![
                String::new(),
                "Documented commands (type help <topic>):".to_string(),
                "========================================".to_string(),
                names.join("  "),
                String::new(),
            ];
        };

        if let Some((_, text)) = HELP_TOPICS.iter().find(|(topic, _)| *topic == name) {
            return vec![text.to_string()];
        }

        match ClassKind::from_name(name) {
            Some(kind) => self.describe_class(kind),
            None => vec![format!("*** No help on {}", name)],
        }
    }

    /// "id, created_at, updated_at" plus the declared fields of a class
    fn describe_class(&self, kind: ClassKind) -> Vec<String> {
        let mut lines = vec![format!("{} fields: id, created_at, updated_at", kind)];
        for attr in self.attributes.fields_of(kind) {
            if attr.description.is_empty() {
                lines.push(format!("  {} ({})", attr.name, attr.type_.as_str()));
            } else {
                lines.push(format!(
                    "  {} ({}): {}",
                    attr.name,
                    attr.type_.as_str(),
                    attr.description
                ));
            }
        }
        lines
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Validate class and id, returning the composite key of an existing object
    fn resolve_instance(&self, class: Option<&str>, id: Option<&str>) -> Result<String, CommandError> {
        let kind = resolve_class(class)?;
        let id = id.ok_or(CommandError::InstanceIdMissing)?;

        let key = format!("{}.{}", kind, id);
        if self.storage.get(&key).is_none() {
            return Err(CommandError::NoInstanceFound);
        }
        Ok(key)
    }

    /// Coerce `raw` through the field schema and store it on the object
    fn assign(&mut self, key: &str, attribute: &str, raw: &str) {
        if let Some(entity) = self.storage.get_mut(key) {
            let value = self.attributes.field_type(entity.kind, attribute).coerce(raw);
            entity.set(attribute, value);
        }
    }

    /// Entity save: touch `updated_at` and flush the whole storage
    fn persist(&mut self, key: &str) -> Result<(), CommandError> {
        self.storage.save_entity(key).map(|_| ()).map_err(save_failed)
    }
}

fn resolve_class(class: Option<&str>) -> Result<ClassKind, CommandError> {
    let name = class.ok_or(CommandError::ClassNameMissing)?;
    ClassKind::from_name(name).ok_or(CommandError::ClassDoesNotExist)
}

fn save_failed(e: anyhow::Error) -> CommandError {
    error!(error = %e, "failed to flush storage");
    CommandError::SaveFailed(format!("{:#}", e))
}

// ============================================================================
// TESTS
// ============================================================================
