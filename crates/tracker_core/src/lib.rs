use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub mod animation;
pub mod generator;
pub mod geo;
pub mod palette;
pub mod store;
pub mod view;

pub use animation::{CounterAnimator, CounterSink};
pub use generator::{default_records, RandomRecordSource, RecordSource};
pub use store::{LoadOutcome, ShipmentStore, SynthesisReason, STORAGE_KEY};
pub use view::{
    FlyToOptions, ListEntry, ListSink, MapSettings, MapSurface, MarkerHandle, MarkerStyle,
    PopupContent, RenderSummary, ViewSynchronizer,
};

/// Single-slot key/value persistence, the shape of browser local storage.
///
/// A slot holds one serialized value and every write replaces it whole.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn read_slot(&self, key: &str) -> Result<Option<String>>;
    async fn write_slot(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key).await
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        (**self).write_slot(key, value).await
    }
}
