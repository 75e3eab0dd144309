//! Board: the ordered object collection an editor or the CLI owns
//!
//! Changes made through the board are reported to subscribed listeners.
//! Board files are JSON arrays of object records.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::core::BoardGuardError;
use crate::geometry::Point;
use crate::model::{ObjectLimits, PcbObject};

/// Change notifications emitted by [`Board`]
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Added(String),
    Removed(String),
    Modified(String),
    Loaded { count: usize, skipped: usize },
    PoursRecalculated(usize),
}

pub type BoardListener = Box<dyn FnMut(&BoardEvent)>;

/// Constraint problems of one object, as reported by [`Board::validate_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProblems {
    pub object_id: String,
    pub problems: Vec<String>,
}

#[derive(Default)]
pub struct Board {
    objects: Vec<PcbObject>,
    limits: ObjectLimits,
    listeners: Vec<BoardListener>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("objects", &self.objects.len())
            .field("limits", &self.limits)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ObjectLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &ObjectLimits {
        &self.limits
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&BoardEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: BoardEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn objects(&self) -> &[PcbObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PcbObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Add an object and return its id
    pub fn add(&mut self, object: PcbObject) -> String {
        let id = object.id().to_string();
        self.objects.push(object);
        self.emit(BoardEvent::Added(id.clone()));
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<PcbObject> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        let removed = self.objects.remove(index);
        self.emit(BoardEvent::Removed(id.to_string()));
        Some(removed)
    }

    /// Apply `edit` to the object with `id` and notify listeners
    pub fn modify<R>(&mut self, id: &str, edit: impl FnOnce(&mut PcbObject) -> R) -> Option<R> {
        let object = self.objects.iter_mut().find(|o| o.id() == id)?;
        let result = edit(object);
        self.emit(BoardEvent::Modified(id.to_string()));
        Some(result)
    }

    /// Visible objects whose exact shape contains `point`, topmost last
    pub fn objects_at(&self, point: &Point) -> Vec<&PcbObject> {
        self.objects
            .iter()
            .filter(|o| o.is_visible() && o.contains_point(point))
            .collect()
    }

    pub fn validate_all(&self) -> Vec<ObjectProblems> {
        self.objects
            .iter()
            .filter_map(|o| {
                let problems = o.validate();
                (!problems.is_empty()).then(|| ObjectProblems {
                    object_id: o.id().to_string(),
                    problems,
                })
            })
            .collect()
    }

    /// Recompute every copper pour against the current collection.
    /// Returns the number of pours updated.
    pub fn recalculate_pours(&mut self) -> usize {
        let computed: Vec<_> = self
            .objects
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.compute_pour(&self.objects).map(|fill| (i, fill)))
            .collect();

        let count = computed.len();
        for (index, (fill, spokes)) in computed {
            self.objects[index].store_pour(fill, spokes);
        }
        tracing::debug!("Recalculated {} copper pours", count);
        self.emit(BoardEvent::PoursRecalculated(count));
        count
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Replace the board contents with the records in `json`.
    ///
    /// The document must be a JSON array. Records with an unknown type or
    /// invalid geometry are skipped with a warning. Returns the number of
    /// objects loaded.
    pub fn load_json_str(&mut self, json: &str) -> Result<usize, BoardGuardError> {
        let records: Vec<Value> = serde_json::from_str(json)?;
        let total = records.len();

        let mut objects = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            match PcbObject::from_json_value(record, &self.limits) {
                Ok(object) => objects.push(object),
                Err(e) => tracing::warn!("Skipping board record {}: {}", index, e),
            }
        }

        let count = objects.len();
        let skipped = total - count;
        self.objects = objects;
        tracing::info!("Loaded {} objects ({} skipped)", count, skipped);
        self.emit(BoardEvent::Loaded { count, skipped });
        Ok(count)
    }

    pub fn from_json_str(json: &str, limits: ObjectLimits) -> Result<Self, BoardGuardError> {
        let mut board = Self::with_limits(limits);
        board.load_json_str(json)?;
        Ok(board)
    }

    pub fn from_json_file(path: &Path, limits: ObjectLimits) -> Result<Self, BoardGuardError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, limits)
    }

    pub fn to_json_string(&self) -> Result<String, BoardGuardError> {
        let records: Vec<_> = self.objects.iter().map(PcbObject::serialize).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn save_json_file(&self, path: &Path) -> Result<(), BoardGuardError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
