//! In-memory record storage.

use std::collections::HashMap;

use ward_core::{Attributes, Record, RecordId, TypeId};

use crate::error::{StoreError, StoreResult};

/// ID allocator for records.
#[derive(Debug)]
struct IdAllocator {
    next_record_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_record_id: 1 }
    }

    fn alloc_record_id(&mut self) -> RecordId {
        let id = RecordId::new(self.next_record_id);
        self.next_record_id += 1;
        id
    }
}

/// The in-memory record store.
///
/// Knows nothing about rules or hooks; callers decide what reaches it.
#[derive(Debug)]
pub struct RecordStore {
    records: HashMap<RecordId, Record>,
    id_alloc: IdAllocator,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            id_alloc: IdAllocator::new(),
        }
    }

    /// Store a new record.
    pub fn insert(&mut self, type_id: TypeId, attributes: Attributes) -> RecordId {
        let id = self.id_alloc.alloc_record_id();
        self.records.insert(id, Record::new(id, type_id, attributes));
        id
    }

    /// Overwrite the given values on an existing record.
    pub fn update(&mut self, id: RecordId, values: Attributes) -> StoreResult<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        record.apply(values);
        Ok(())
    }

    /// Get a record by ID.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
