//! Text stand-ins for the map widget, the sidebar list and the stats counter.

use std::{
    collections::VecDeque,
    fmt::Write as _,
    io::Write as _,
    sync::atomic::{AtomicI64, Ordering},
};

use shared::domain::{Coordinate, FleetStats};
use tracker_core::{
    CounterSink, FlyToOptions, ListEntry, ListSink, MapSettings, MapSurface, MarkerHandle,
    MarkerStyle, PopupContent,
};

#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub at: Coordinate,
    pub style: MarkerStyle,
    pub popup: PopupContent,
}

pub struct TerminalMap {
    settings: MapSettings,
    markers: Vec<PlacedMarker>,
    center: Coordinate,
    zoom: u8,
    open_popup: Option<MarkerHandle>,
}

impl TerminalMap {
    pub fn new(settings: MapSettings) -> Self {
        Self {
            center: settings.center,
            zoom: settings.zoom,
            settings,
            markers: Vec::new(),
            open_popup: None,
        }
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    pub fn camera(&self) -> (Coordinate, u8) {
        (self.center, self.zoom)
    }

    pub fn opened_popup(&self) -> Option<&PopupContent> {
        self.open_popup
            .and_then(|handle| self.markers.get(handle.0))
            .map(|marker| &marker.popup)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let (center, zoom) = self.camera();
        let _ = writeln!(
            out,
            "map  center {center}  zoom {zoom}/{}  tiles {}",
            self.settings.max_zoom, self.settings.tile_url
        );
        for marker in self.markers() {
            let _ = writeln!(
                out,
                "  ● {:<8} {:<22} {}",
                marker.popup.id,
                format!("({})", marker.at),
                marker.style.color
            );
        }
        out
    }
}

impl MapSurface for TerminalMap {
    fn place_marker(
        &mut self,
        at: Coordinate,
        style: &MarkerStyle,
        popup: PopupContent,
    ) -> MarkerHandle {
        self.markers.push(PlacedMarker {
            at,
            style: style.clone(),
            popup,
        });
        MarkerHandle(self.markers.len() - 1)
    }

    fn clear_all_markers(&mut self) {
        self.markers.clear();
        self.open_popup = None;
    }

    fn fly_to(&mut self, at: Coordinate, options: &FlyToOptions) {
        tracing::debug!(
            target_center = %at,
            zoom = options.zoom,
            animate = options.animate,
            duration_ms = options.duration.as_millis() as u64,
            "flying map camera"
        );
        self.center = at;
        self.zoom = options.zoom.min(self.settings.max_zoom);
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        if marker.0 < self.markers.len() {
            self.open_popup = Some(marker);
        }
    }
}

#[derive(Default)]
pub struct TerminalList {
    entries: VecDeque<ListEntry>,
}

impl TerminalList {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "  {:<8} {:<28} [{}] {}",
                entry.id,
                entry.route,
                entry.status,
                entry.tone.css_class()
            );
        }
        out
    }
}

impl ListSink for TerminalList {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn prepend(&mut self, entry: ListEntry) {
        self.entries.push_front(entry);
    }
}

pub fn render_popup(popup: &PopupContent) -> String {
    let mut out = format!("┌ {}\n", popup.id);
    for (label, value) in popup.rows() {
        let _ = writeln!(out, "│ {label:<12} {value}");
    }
    out.push('└');
    out
}

pub fn render_stats(stats: &FleetStats) -> String {
    format!("shipments: {} total, {} active", stats.total, stats.active)
}

/// Active-shipment counter repainted in place on stderr.
#[derive(Default)]
pub struct TerminalCounter {
    value: AtomicI64,
}

impl TerminalCounter {
    pub fn starting_at(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }
}

impl CounterSink for TerminalCounter {
    fn displayed(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    fn show(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\ractive shipments: {value:>5}");
        let _ = stderr.flush();
    }
}
