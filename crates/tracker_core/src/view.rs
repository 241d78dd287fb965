//! Stateless rebuild of the map markers and the shipment list.
//!
//! Every refresh tears down both presentations and redraws them from the
//! record slice it is handed. Nothing is diffed and nothing survives between
//! refreshes except the selection table for the entries just drawn.

use std::{collections::VecDeque, time::Duration};

use shared::domain::{Coordinate, ShipmentId, ShipmentRecord, ShipmentStatus};
use tracing::debug;

use crate::{geo, palette::StatusTone};

pub const MARKER_ICON_SIZE: (u32, u32) = (16, 16);
pub const MARKER_ICON_ANCHOR: (u32, u32) = (8, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    pub tone: StatusTone,
    pub color: &'static str,
    pub icon_size: (u32, u32),
    pub icon_anchor: (u32, u32),
}

impl MarkerStyle {
    pub fn for_status(status: &ShipmentStatus) -> Self {
        let tone = StatusTone::for_status(status);
        Self {
            tone,
            color: tone.color(),
            icon_size: MARKER_ICON_SIZE,
            icon_anchor: MARKER_ICON_ANCHOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub id: ShipmentId,
    pub status: String,
    pub status_color: &'static str,
    pub location: String,
    pub destination: String,
    pub progress: u8,
}

impl PopupContent {
    pub fn from_record(record: &ShipmentRecord) -> Self {
        Self {
            id: record.id.clone(),
            status: record.status.label().to_string(),
            status_color: StatusTone::for_status(&record.status).color(),
            location: record.location.clone(),
            destination: record.destination.clone(),
            progress: record.progress,
        }
    }

    /// Label/value rows below the popup title.
    pub fn rows(&self) -> [(&'static str, String); 4] {
        [
            ("Status", self.status.clone()),
            ("Location", self.location.clone()),
            ("Destination", self.destination.clone()),
            ("Progress", format!("{}%", self.progress)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: ShipmentId,
    pub route: String,
    pub status: String,
    pub tone: StatusTone,
    pub badge_background: String,
}

impl ListEntry {
    pub fn from_record(record: &ShipmentRecord) -> Self {
        let tone = StatusTone::for_status(&record.status);
        Self {
            id: record.id.clone(),
            route: record.route(),
            status: record.status.label().to_string(),
            tone,
            badge_background: tone.badge_background(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyToOptions {
    pub zoom: u8,
    pub animate: bool,
    pub duration: Duration,
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            zoom: 10,
            animate: true,
            duration: Duration::from_millis(1500),
        }
    }
}

/// Initial camera and basemap for whatever draws the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub tile_subdomains: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: geo::DEFAULT_COORDINATE,
            zoom: 6,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".into(),
            tile_subdomains: "abcd".into(),
            attribution: "© OpenStreetMap contributors © CARTO".into(),
            max_zoom: 19,
        }
    }
}

/// Marker layer of the map collaborator.
pub trait MapSurface {
    fn place_marker(
        &mut self,
        at: Coordinate,
        style: &MarkerStyle,
        popup: PopupContent,
    ) -> MarkerHandle;
    fn clear_all_markers(&mut self);
    fn fly_to(&mut self, at: Coordinate, options: &FlyToOptions);
    fn open_popup(&mut self, marker: MarkerHandle);
}

/// List container of the page.
pub trait ListSink {
    fn clear(&mut self);
    fn prepend(&mut self, entry: ListEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub markers: usize,
    pub entries: usize,
}

#[derive(Debug, Clone)]
struct Selectable {
    id: ShipmentId,
    coordinate: Coordinate,
    marker: Option<MarkerHandle>,
}

pub struct ViewSynchronizer<M, L> {
    map: Option<M>,
    list: Option<L>,
    fly_to: FlyToOptions,
    // top of the list first
    selectable: VecDeque<Selectable>,
}

impl<M: MapSurface, L: ListSink> ViewSynchronizer<M, L> {
    pub fn new(map: Option<M>, list: Option<L>) -> Self {
        Self {
            map,
            list,
            fly_to: FlyToOptions::default(),
            selectable: VecDeque::new(),
        }
    }

    pub fn with_fly_to(mut self, options: FlyToOptions) -> Self {
        self.fly_to = options;
        self
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn list(&self) -> Option<&L> {
        self.list.as_ref()
    }

    /// Ids in list order, most recently rendered first.
    pub fn entry_ids(&self) -> impl Iterator<Item = &ShipmentId> {
        self.selectable.iter().map(|entry| &entry.id)
    }

    pub fn refresh(&mut self, records: &[ShipmentRecord]) -> RenderSummary {
        match self.map.as_mut() {
            Some(map) => map.clear_all_markers(),
            None => debug!("no map surface attached; skipping marker teardown"),
        }
        match self.list.as_mut() {
            Some(list) => list.clear(),
            None => debug!("no list container attached; skipping list teardown"),
        }
        self.selectable.clear();

        let mut summary = RenderSummary::default();
        for record in records {
            let drawn = self.render_one(record);
            summary.markers += drawn.markers;
            summary.entries += drawn.entries;
        }

        debug!(
            records = records.len(),
            markers = summary.markers,
            entries = summary.entries,
            "refreshed shipment view"
        );
        summary
    }

    /// Draws one marker and prepends one list entry for `record`.
    pub fn render_one(&mut self, record: &ShipmentRecord) -> RenderSummary {
        let coordinate = geo::resolve(&record.location);
        let style = MarkerStyle::for_status(&record.status);
        let mut drawn = RenderSummary::default();

        let marker = self.map.as_mut().map(|map| {
            drawn.markers += 1;
            map.place_marker(coordinate, &style, PopupContent::from_record(record))
        });
        if let Some(list) = self.list.as_mut() {
            list.prepend(ListEntry::from_record(record));
            drawn.entries += 1;
        }

        self.selectable.push_front(Selectable {
            id: record.id.clone(),
            coordinate,
            marker,
        });
        drawn
    }

    /// Centers the map on the entry with `id` and opens its popup.
    ///
    /// With duplicate ids the topmost entry wins.
    pub fn select(&mut self, id: &ShipmentId) -> Option<Coordinate> {
        let position = self.selectable.iter().position(|entry| &entry.id == id)?;
        self.select_at(position)
    }

    pub fn select_at(&mut self, position: usize) -> Option<Coordinate> {
        let entry = self.selectable.get(position)?.clone();
        let Some(map) = self.map.as_mut() else {
            debug!(id = %entry.id, "no map surface attached; ignoring selection");
            return None;
        };

        map.fly_to(entry.coordinate, &self.fly_to);
        if let Some(marker) = entry.marker {
            map.open_popup(marker);
        }
        debug!(id = %entry.id, coordinate = %entry.coordinate, "selected shipment");
        Some(entry.coordinate)
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
