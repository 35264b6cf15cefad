use super::backend::StorageBackend;
use super::persist::{Persistence, SlotState};
use crate::error::{RecordzError, Result};
use crate::model::{Fields, IdGenerator, Record, RecordId};
use crate::schema::Schema;
use chrono::Utc;

/// The in-memory collection for one schema, mirrored to its storage slot.
///
/// Every successful mutation is written through immediately. A failed write
/// does not undo the mutation: the in-memory state stays authoritative and the
/// failure is parked as a notice for the caller to surface (see
/// [`RecordStore::take_notice`]).
pub struct RecordStore<B: StorageBackend> {
    schema: &'static Schema,
    key: String,
    records: Vec<Record>,
    persistence: Persistence<B>,
    ids: IdGenerator,
    origin: SlotState,
    importing: bool,
    notice: Option<RecordzError>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Hydrate the collection stored under the schema's name.
    pub fn open(schema: &'static Schema, backend: B) -> Self {
        Self::open_with_key(schema, schema.name, backend)
    }

    /// Hydrate from `key`, seeding with the schema's samples when the slot is
    /// missing or corrupt.
    pub fn open_with_key(schema: &'static Schema, key: &str, backend: B) -> Self {
        let persistence = Persistence::new(backend);
        let mut ids = IdGenerator::new();
        let (records, origin) =
            persistence.load_detailed(key, || schema.seed_records(&mut ids));
        for record in &records {
            ids.observe(&record.id);
        }
        tracing::debug!(key, count = records.len(), ?origin, "collection hydrated");

        Self {
            schema,
            key: key.to_string(),
            records,
            persistence,
            ids,
            origin,
            importing: false,
            notice: None,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        self.persistence.backend()
    }

    /// Where the hydrated records came from.
    pub fn origin(&self) -> &SlotState {
        &self.origin
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn is_busy(&self) -> bool {
        self.importing
    }

    /// The last persistence failure, if any. Taking it dismisses it.
    pub fn take_notice(&mut self) -> Option<RecordzError> {
        self.notice.take()
    }

    pub fn create(&mut self, fields: Fields) -> Result<Record> {
        self.ensure_idle()?;
        let fields = self.schema.with_defaults(fields);
        self.schema.validate(&fields)?;

        let record = Record::new(self.fresh_id(), fields);
        self.records.push(record.clone());
        self.persist();
        Ok(record)
    }

    /// Merge `fields` into the record; fields not mentioned are left alone.
    pub fn update(&mut self, id: &RecordId, fields: Fields) -> Result<Record> {
        self.ensure_idle()?;
        let pos = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| RecordzError::RecordNotFound(id.clone()))?;

        let mut merged = self.records[pos].fields.clone();
        merged.extend(fields);
        self.schema.validate(&merged)?;

        let record = &mut self.records[pos];
        record.fields = merged;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.persist();
        Ok(updated)
    }

    /// Remove a record. Returns whether anything was removed.
    pub fn delete(&mut self, id: &RecordId) -> Result<bool> {
        self.ensure_idle()?;
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist();
        }
        Ok(removed)
    }

    /// Drop every record. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        self.ensure_idle()?;
        let removed = self.records.len();
        self.records.clear();
        self.persist();
        Ok(removed)
    }

    /// Replace the collection with the schema's sample records.
    pub fn reseed(&mut self) -> Result<usize> {
        self.ensure_idle()?;
        self.records = self.schema.seed_records(&mut self.ids);
        self.persist();
        Ok(self.records.len())
    }

    /// Mark the store as being rebuilt by an import. Mutations fail with
    /// [`RecordzError::Busy`] until [`finish_import`](Self::finish_import) or
    /// [`abort_import`](Self::abort_import).
    pub fn begin_import(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.importing = true;
        Ok(())
    }

    pub fn abort_import(&mut self) {
        self.importing = false;
    }

    /// Append a parsed batch under fresh ids and persist once.
    pub fn finish_import(&mut self, batch: Vec<Fields>) -> Result<Vec<Record>> {
        if !self.importing {
            return Err(RecordzError::Api("No import in progress".to_string()));
        }
        self.importing = false;

        let mut prepared = Vec::with_capacity(batch.len());
        for fields in batch {
            let fields = self.schema.with_defaults(fields);
            self.schema.validate(&fields)?;
            prepared.push(fields);
        }

        let mut created = Vec::with_capacity(prepared.len());
        for fields in prepared {
            let record = Record::new(self.fresh_id(), fields);
            self.records.push(record.clone());
            created.push(record);
        }
        if !created.is_empty() {
            self.persist();
        }
        Ok(created)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.importing {
            Err(RecordzError::Busy)
        } else {
            Ok(())
        }
    }

    fn fresh_id(&mut self) -> RecordId {
        loop {
            let id = self.ids.next();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.key, &self.records) {
            tracing::warn!(key = %self.key, error = %e, "changes are not persisted");
            self.notice = Some(e);
        }
    }
}
