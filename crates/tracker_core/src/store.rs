use std::collections::HashSet;

use anyhow::{Context, Result};
use shared::{
    domain::{FleetStats, ShipmentId, ShipmentRecord},
    error::{ErrorCode, TrackerError},
};
use tracing::{debug, info, warn};

use crate::{
    generator::{default_records, RandomRecordSource, RecordSource, ID_NUMBER_RANGE},
    SlotStore,
};

pub const STORAGE_KEY: &str = "winwin_packages_v1";
const MAX_ID_DRAWS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisReason {
    Missing,
    Empty,
    Unreadable(TrackerError),
    Corrupt(TrackerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored { count: usize },
    Synthesized(SynthesisReason),
}

impl LoadOutcome {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, LoadOutcome::Synthesized(_))
    }
}

/// Owner of the shipment sequence, written through to one storage slot.
///
/// Memory only changes after the slot write succeeded, so the in-memory
/// sequence and the persisted one stay equal across every call.
pub struct ShipmentStore<S: SlotStore> {
    slots: S,
    key: String,
    source: Box<dyn RecordSource>,
    records: Vec<ShipmentRecord>,
    load_outcome: LoadOutcome,
}

impl<S: SlotStore> ShipmentStore<S> {
    pub async fn open(slots: S) -> Result<Self> {
        Self::open_with(slots, STORAGE_KEY, Box::new(RandomRecordSource::new())).await
    }

    pub async fn open_with(
        slots: S,
        key: impl Into<String>,
        source: Box<dyn RecordSource>,
    ) -> Result<Self> {
        let mut store = Self {
            slots,
            key: key.into(),
            source,
            records: Vec::new(),
            load_outcome: LoadOutcome::Synthesized(SynthesisReason::Missing),
        };
        store.initialize().await?;
        Ok(store)
    }

    /// Reloads the sequence from the slot, falling back to the default set
    /// (and persisting it) when the slot is missing, empty or unusable.
    pub async fn initialize(&mut self) -> Result<&LoadOutcome> {
        let reason = match self.slots.read_slot(&self.key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ShipmentRecord>>(&raw) {
                Ok(records) if records.is_empty() => SynthesisReason::Empty,
                Ok(records) => {
                    warn_about_loose_records(&records);
                    info!(key = %self.key, count = records.len(), "restored shipment records");
                    self.load_outcome = LoadOutcome::Restored {
                        count: records.len(),
                    };
                    self.records = records;
                    return Ok(&self.load_outcome);
                }
                Err(error) => {
                    warn!(key = %self.key, %error, "persisted shipment records are corrupt; using defaults");
                    SynthesisReason::Corrupt(TrackerError::corrupt_state(error.to_string()))
                }
            },
            Ok(None) => SynthesisReason::Missing,
            Err(error) => {
                warn!(key = %self.key, error = %format!("{error:#}"), "failed to read shipment slot; using defaults");
                SynthesisReason::Unreadable(TrackerError::storage_unavailable(format!(
                    "{error:#}"
                )))
            }
        };

        self.persist(default_records())
            .await
            .context("failed to persist default shipment records")?;
        info!(key = %self.key, ?reason, "synthesized default shipment records");
        self.load_outcome = LoadOutcome::Synthesized(reason);
        Ok(&self.load_outcome)
    }

    pub fn all(&self) -> &[ShipmentRecord] {
        &self.records
    }

    pub fn snapshot(&self) -> Vec<ShipmentRecord> {
        self.records.clone()
    }

    pub fn find(&self, id: &ShipmentId) -> Option<&ShipmentRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn stats(&self) -> FleetStats {
        FleetStats::from_records(&self.records)
    }

    /// Replaces the whole persisted sequence, then the in-memory one.
    pub async fn persist(&mut self, records: Vec<ShipmentRecord>) -> Result<()> {
        let blob =
            serde_json::to_string(&records).context("failed to serialize shipment records")?;
        self.slots
            .write_slot(&self.key, &blob)
            .await
            .with_context(|| format!("failed to write shipment slot '{}'", self.key))?;
        debug!(key = %self.key, count = records.len(), "persisted shipment records");
        self.records = records;
        Ok(())
    }

    pub async fn generate(&mut self) -> Result<ShipmentRecord> {
        let id = self.next_free_id()?;
        let record = self.source.draw_record(id);

        let mut next = self.records.clone();
        next.push(record.clone());
        self.persist(next).await?;

        info!(
            id = %record.id,
            status = %record.status,
            location = %record.location,
            progress = record.progress,
            "generated demo shipment"
        );
        Ok(record)
    }

    fn next_free_id(&mut self) -> Result<ShipmentId> {
        let taken: HashSet<&ShipmentId> = self.records.iter().map(|record| &record.id).collect();

        for attempt in 1..=MAX_ID_DRAWS {
            let candidate = self.source.draw_id();
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            debug!(%candidate, attempt, "drawn shipment id already taken; redrawing");
        }

        let fallback = ID_NUMBER_RANGE
            .map(ShipmentId::from_number)
            .find(|candidate| !taken.contains(candidate));
        match fallback {
            Some(id) => {
                warn!(%id, "random id draws kept colliding; using lowest free id");
                Ok(id)
            }
            None => Err(TrackerError::new(
                ErrorCode::IdSpaceExhausted,
                format!("all {} shipment ids are taken", ID_NUMBER_RANGE.len()),
            )
            .into()),
        }
    }
}

fn warn_about_loose_records(records: &[ShipmentRecord]) {
    for record in records {
        if !record.id.is_well_formed() {
            warn!(id = %record.id, "restored shipment id does not follow the PK-#### form");
        }
        if record.progress > 100 {
            warn!(id = %record.id, progress = record.progress, "restored shipment progress exceeds 100");
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
