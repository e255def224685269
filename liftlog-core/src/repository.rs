//! Typed entity access over the table store.
//!
//! Each entity kind maps to one table. Reads load the whole table; writes
//! load, modify and save the whole table. Operations spanning several
//! entities issue one write per entity, in order, with no transaction: a
//! crash part way leaves each entity intact but the set of entities only
//! partly updated. Read paths tolerate the two shapes this can leave behind
//! (a lift without a cycle, a log or cycle without a lift).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    validate_max, Cycle, CycleRecord, Lift, LiftChanges, LiftRecord, Log, LogRecord, NewLog,
    Phase,
};
use crate::progression;
use crate::schema;
use crate::state::{reduce, Action, State};
use crate::storage::{BlobStore, Table, TableMap, TableStore};

/// An entity stored in its own table, keyed by id.
pub trait Entity: Sized {
    /// Stored shape: the entity without its id.
    type Record: Serialize + DeserializeOwned;

    const TABLE: Table;
    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn from_record(id: Uuid, record: Self::Record) -> Self;
    fn to_record(&self) -> Self::Record;

    /// Checks a record before it is written.
    fn validate(_record: &Self::Record) -> Result<()> {
        Ok(())
    }
}

impl Entity for Lift {
    type Record = LiftRecord;
    const TABLE: Table = Table::Lifts;
    const KIND: &'static str = "lift";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_record(id: Uuid, record: LiftRecord) -> Self {
        Lift::from_record(id, record)
    }

    fn to_record(&self) -> LiftRecord {
        Lift::to_record(self)
    }

    fn validate(record: &LiftRecord) -> Result<()> {
        record.validate()
    }
}

impl Entity for Cycle {
    type Record = CycleRecord;
    const TABLE: Table = Table::Cycles;
    const KIND: &'static str = "cycle";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_record(id: Uuid, record: CycleRecord) -> Self {
        Cycle::from_record(id, record)
    }

    fn to_record(&self) -> CycleRecord {
        Cycle::to_record(self)
    }
}

impl Entity for Log {
    type Record = LogRecord;
    const TABLE: Table = Table::Logs;
    const KIND: &'static str = "log";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_record(id: Uuid, record: LogRecord) -> Self {
        Log::from_record(id, record)
    }

    fn to_record(&self) -> LogRecord {
        Log::to_record(self)
    }

    fn validate(record: &LogRecord) -> Result<()> {
        if !record.weight.is_finite() || record.weight <= 0.0 || record.reps == 0 {
            return Err(StoreError::invalid(format!(
                "invalid log {} x {}",
                record.weight, record.reps
            )));
        }
        Ok(())
    }
}

fn parse_key(table: Table, key: &str) -> Result<Uuid> {
    Uuid::parse_str(key).map_err(|e| StoreError::CorruptStorage {
        table: table.key(),
        source: <serde_json::Error as serde::de::Error>::custom(format!(
            "invalid id key '{key}': {e}"
        )),
    })
}

/// Typed CRUD for lifts, cycles and logs.
#[derive(Clone)]
pub struct Repository {
    tables: TableStore,
}

impl Repository {
    /// Opens a repository, bringing the stored schema up to date first.
    pub async fn open(blobs: Arc<dyn BlobStore>) -> Result<Self> {
        let tables = TableStore::new(blobs);
        schema::migrate(&tables).await?;
        Ok(Self { tables })
    }

    async fn load<E: Entity>(&self) -> Result<TableMap<E::Record>> {
        self.tables.load(E::TABLE).await
    }

    /// Returns every entity of a kind, in table key order.
    pub async fn query_all<E: Entity>(&self) -> Result<Vec<E>> {
        let rows = self.load::<E>().await?;
        rows.into_iter()
            .map(|(key, record)| Ok(E::from_record(parse_key(E::TABLE, &key)?, record)))
            .collect()
    }

    pub async fn find<E: Entity>(&self, id: Uuid) -> Result<Option<E>> {
        let mut rows = self.load::<E>().await?;
        Ok(rows
            .remove(&id.to_string())
            .map(|record| E::from_record(id, record)))
    }

    /// Like [`find`](Self::find), but a missing id is [`StoreError::NotFound`].
    pub async fn get<E: Entity>(&self, id: Uuid) -> Result<E> {
        self.find(id)
            .await?
            .ok_or_else(|| StoreError::not_found(E::KIND, id))
    }

    /// Stores a new entity under a freshly generated id.
    ///
    /// Ids are random v4 UUIDs; a collision would overwrite the existing
    /// row and is not checked for.
    pub async fn create<E: Entity>(&self, record: E::Record) -> Result<E> {
        E::validate(&record)?;
        let id = Uuid::new_v4();
        let mut rows = self.load::<E>().await?;
        rows.insert(id.to_string(), record);
        self.tables.save(E::TABLE, &rows).await?;

        let record = rows
            .remove(&id.to_string())
            .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
        tracing::info!(kind = E::KIND, %id, "created");
        Ok(E::from_record(id, record))
    }

    /// Overwrites an existing entity. The id must already be stored.
    pub async fn update<E: Entity>(&self, entity: &E) -> Result<E> {
        let record = entity.to_record();
        E::validate(&record)?;
        let id = entity.id();
        let mut rows = self.load::<E>().await?;
        let slot = rows
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
        *slot = record;
        self.tables.save(E::TABLE, &rows).await?;
        self.get(id).await
    }

    // Writes an entity at its own id, inserting or replacing.
    async fn put<E: Entity>(&self, entity: &E) -> Result<()> {
        let record = entity.to_record();
        E::validate(&record)?;
        let mut rows = self.load::<E>().await?;
        rows.insert(entity.id().to_string(), record);
        self.tables.save(E::TABLE, &rows).await
    }

    /// Creates a lift together with its empty cycle.
    ///
    /// Two writes: if the second never happens the lift is left without a
    /// cycle, which [`cycle_for`](Self::cycle_for) repairs on demand.
    pub async fn create_lift(&self, record: LiftRecord) -> Result<(Lift, Cycle)> {
        let record = LiftRecord {
            name: record.name.trim().to_string(),
            ..record
        };
        let lift: Lift = self.create(record).await?;
        let cycle = Cycle::new(lift.id);
        self.put(&cycle).await?;
        Ok((lift, cycle))
    }

    /// Applies edits to a stored lift.
    pub async fn edit_lift(&self, id: Uuid, changes: &LiftChanges) -> Result<Lift> {
        if changes.is_empty() {
            return Err(StoreError::invalid(
                "nothing to update, provide at least one change",
            ));
        }
        if let Some(max) = changes.max {
            validate_max(max)?;
        }
        let lift: Lift = self.get(id).await?;
        self.update(&lift.with_changes(changes)).await
    }

    /// Returns the cycle for a lift, creating an empty one if it is missing.
    pub async fn cycle_for(&self, lift_id: Uuid) -> Result<Cycle> {
        if let Some(cycle) = self.find::<Cycle>(lift_id).await? {
            return Ok(cycle);
        }
        tracing::warn!(%lift_id, "lift has no cycle, creating one");
        let cycle = Cycle::new(lift_id);
        self.put(&cycle).await?;
        Ok(cycle)
    }

    /// Records a performed set and marks `phase` complete for its lift.
    ///
    /// The log is written first, then the cycle.
    pub async fn log_set(&self, new_log: NewLog, phase: Phase) -> Result<(Log, Cycle)> {
        new_log.validate()?;
        let lift: Lift = self.get(new_log.lift_id).await?;

        let log: Log = self.create(new_log.into_record()).await?;
        let cycle = self.cycle_for(lift.id).await?;
        let cycle = progression::log_phase(&cycle, phase);
        self.put(&cycle).await?;

        tracing::info!(lift = %lift.name, %phase, weight = log.weight, reps = log.reps, "logged set");
        Ok((log, cycle))
    }

    /// Logs for one lift, oldest first.
    pub async fn logs_for(&self, lift_id: Uuid) -> Result<Vec<Log>> {
        let mut logs: Vec<Log> = self
            .query_all::<Log>()
            .await?
            .into_iter()
            .filter(|log| log.lift_id == lift_id)
            .collect();
        logs.sort_by_key(|log| log.date);
        Ok(logs)
    }

    /// Resets every lift's cycle and optionally raises every max.
    ///
    /// One write per cycle, then one per lift. Not atomic across entities.
    pub async fn start_new_cycle(&self, increase_maxes: bool) -> Result<(Vec<Cycle>, Vec<Lift>)> {
        let lifts: Vec<Lift> = self.query_all().await?;
        let stored: Vec<Cycle> = self.query_all().await?;

        let mut cycles = Vec::with_capacity(lifts.len());
        for lift in &lifts {
            match stored.iter().find(|cycle| cycle.id == lift.id) {
                Some(cycle) => cycles.push(*cycle),
                None => cycles.push(Cycle::new(lift.id)),
            }
        }
        for cycle in &stored {
            if !lifts.iter().any(|lift| lift.id == cycle.id) {
                tracing::warn!(cycle_id = %cycle.id, "skipping cycle without a lift");
            }
        }

        let (cycles, lifts) = progression::start_new_cycle(&cycles, &lifts, increase_maxes);
        for cycle in &cycles {
            self.put(cycle).await?;
        }
        if increase_maxes {
            for lift in &lifts {
                self.update(lift).await?;
            }
        }

        tracing::info!(lifts = lifts.len(), increase_maxes, "started new cycle");
        Ok((cycles, lifts))
    }

    /// Loads every table into a fresh application state.
    pub async fn load_state(&self) -> Result<State> {
        let lifts = self.query_all().await?;
        let cycles = self.query_all().await?;
        let logs = self.query_all().await?;
        Ok(reduce(
            State::default(),
            Action::Loaded {
                lifts,
                cycles,
                logs,
            },
        ))
    }
}
