// 💾 File Storage - In-memory object registry backed by one JSON document
//
// All live entities are kept under "ClassName.id". Every mutation rewrites the
// whole document; the dataset is small and there is a single writer.

use crate::entities::{ClassKind, Entity};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

// ============================================================================
// FILE STORAGE
// ============================================================================

pub struct FileStorage {
    /// Path of the backing JSON document
    file_path: PathBuf,

    /// Live objects keyed by "ClassName.id"
    objects: BTreeMap<String, Entity>,
}

impl FileStorage {
    /// Create an empty storage bound to `file_path` (nothing is read)
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        FileStorage {
            file_path: file_path.into(),
            objects: BTreeMap::new(),
        }
    }

    /// Create a storage and load whatever the backing file holds
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let mut storage = Self::new(file_path);
        storage.reload()?;
        Ok(storage)
    }

    /// Live key → entity mapping
    pub fn all(&self) -> &BTreeMap<String, Entity> {
        &self.objects
    }

    /// Mutable view of the live mapping; callers may remove entries directly
    pub fn all_mut(&mut self) -> &mut BTreeMap<String, Entity> {
        &mut self.objects
    }

    /// Register an entity under its composite key (last write wins)
    pub fn new_object(&mut self, entity: Option<Entity>) {
        if let Some(entity) = entity {
            self.insert(entity);
        }
    }

    /// Register an entity, returning its composite key
    pub fn insert(&mut self, entity: Entity) -> String {
        let key = entity.key();
        if self.objects.insert(key.clone(), entity).is_some() {
            debug!(key = %key, "replaced existing object");
        }
        key
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        self.objects.remove(key)
    }

    /// Objects of one class, in key order
    pub fn of_kind(&self, kind: ClassKind) -> impl Iterator<Item = &Entity> {
        let prefix = kind.key_prefix();
        self.objects
            .iter()
            .filter(move |(key, _)| key.starts_with(&prefix))
            .map(|(_, entity)| entity)
    }

    /// Number of stored objects whose key has the "Class." prefix
    pub fn count(&self, kind: ClassKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Entity save: bump `updated_at` on one object, then flush everything
    ///
    /// Returns `Ok(false)` when no object has that key.
    pub fn save_entity(&mut self, key: &str) -> Result<bool> {
        match self.objects.get_mut(key) {
            Some(entity) => entity.touch(),
            None => return Ok(false),
        }
        self.save()?;
        Ok(true)
    }

    /// Serialize every object into one JSON document and overwrite the file
    pub fn save(&self) -> Result<()> {
        let document: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.clone(), Value::Object(entity.to_map())))
            .collect();

        let json = serde_json::to_string(&document).context("Failed to serialize objects")?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;

        info!(
            path = %self.file_path.display(),
            objects = self.objects.len(),
            "storage saved"
        );
        Ok(())
    }

    /// Load the backing file into the live mapping
    ///
    /// A missing file is not an error. A file that is not a JSON object is
    /// treated as holding no data; records that fail to rehydrate are skipped.
    /// Returns the number of objects loaded.
    pub fn reload(&mut self) -> Result<usize> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no storage file yet");
                return Ok(0);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read {}", self.file_path.display())
                })
            }
        };

        let document: Map<String, Value> = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    path = %self.file_path.display(),
                    error = %e,
                    "storage file is not a JSON object, starting empty"
                );
                return Ok(0);
            }
        };

        let mut loaded = 0;
        for (key, record) in document {
            let rebuilt = match record.as_object() {
                Some(fields) => Entity::from_map(fields),
                None => Err(anyhow::anyhow!("record is not an object")),
            };

            match rebuilt {
                Ok(entity) => {
                    self.objects.insert(key, entity);
                    loaded += 1;
                }
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable record"),
            }
        }

        info!(path = %self.file_path.display(), objects = loaded, "storage reloaded");
        Ok(loaded)
    }

    /// Final flush before the storage is dropped
    pub fn close(self) -> Result<()> {
        self.save()
    }
}

// ============================================================================
// TESTS
// ============================================================================
