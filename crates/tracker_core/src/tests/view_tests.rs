use super::*;
use crate::{generator::default_records, geo::DEFAULT_COORDINATE};

#[derive(Default)]
struct RecordingMap {
    markers: Vec<(Coordinate, MarkerStyle, PopupContent)>,
    next_handle: usize,
    clears: usize,
    flights: Vec<(Coordinate, FlyToOptions)>,
    opened: Vec<MarkerHandle>,
    handles: Vec<MarkerHandle>,
}

impl MapSurface for RecordingMap {
    fn place_marker(
        &mut self,
        at: Coordinate,
        style: &MarkerStyle,
        popup: PopupContent,
    ) -> MarkerHandle {
        self.markers.push((at, style.clone(), popup));
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.push(handle);
        handle
    }

    fn clear_all_markers(&mut self) {
        self.markers.clear();
        self.handles.clear();
        self.clears += 1;
    }

    fn fly_to(&mut self, at: Coordinate, options: &FlyToOptions) {
        self.flights.push((at, *options));
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        self.opened.push(marker);
    }
}

#[derive(Default)]
struct RecordingList {
    entries: VecDeque<ListEntry>,
}

impl ListSink for RecordingList {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn prepend(&mut self, entry: ListEntry) {
        self.entries.push_front(entry);
    }
}

fn synchronizer() -> ViewSynchronizer<RecordingMap, RecordingList> {
    ViewSynchronizer::new(Some(RecordingMap::default()), Some(RecordingList::default()))
}

fn listed_ids(sync: &ViewSynchronizer<RecordingMap, RecordingList>) -> Vec<String> {
    sync.list()
        .expect("list")
        .entries
        .iter()
        .map(|entry| entry.id.to_string())
        .collect()
}

#[test]
fn refresh_renders_one_marker_and_entry_per_record() {
    let mut sync = synchronizer();
    let records = default_records();

    let summary = sync.refresh(&records);

    assert_eq!(summary, RenderSummary { markers: 3, entries: 3 });
    assert_eq!(sync.map().expect("map").markers.len(), 3);
    assert_eq!(sync.list().expect("list").entries.len(), 3);
}

#[test]
fn newest_record_is_listed_first() {
    let mut sync = synchronizer();
    sync.refresh(&default_records());

    assert_eq!(listed_ids(&sync), ["PK-1003", "PK-1002", "PK-1001"]);
    let ids: Vec<String> = sync.entry_ids().map(ToString::to_string).collect();
    assert_eq!(ids, listed_ids(&sync));
}

#[test]
fn refresh_discards_previous_presentation() {
    let mut sync = synchronizer();
    let mut records = default_records();
    sync.refresh(&records);

    records.truncate(1);
    let summary = sync.refresh(&records);

    assert_eq!(summary, RenderSummary { markers: 1, entries: 1 });
    assert_eq!(sync.map().expect("map").clears, 2);
    assert_eq!(listed_ids(&sync), ["PK-1001"]);
}

#[test]
fn markers_use_directory_coordinates_and_status_colors() {
    let mut sync = synchronizer();
    sync.refresh(&default_records());

    let markers = &sync.map().expect("map").markers;
    let (warsaw, transit_style, transit_popup) = &markers[0];
    assert_eq!(*warsaw, Coordinate::new(52.2297, 21.0122));
    assert_eq!(transit_style.color, "#00b4d8");
    assert_eq!(transit_style.icon_size, (16, 16));
    assert_eq!(transit_popup.rows()[3], ("Progress", "45%".to_string()));

    assert_eq!(markers[1].1.color, "#2ecc71");
    assert_eq!(markers[2].1.color, "#f39c12");
    assert_eq!(markers[2].0, Coordinate::new(52.52, 13.405));
}

#[test]
fn unknown_location_is_drawn_at_default_coordinate() {
    let mut sync = synchronizer();
    let atlantis = ShipmentRecord::new(
        ShipmentId::from_number(1234),
        ShipmentStatus::InTransit,
        "Atlantis",
        "Polska",
        20,
    );

    let summary = sync.refresh(&[atlantis]);

    assert_eq!(summary.markers, 1);
    assert_eq!(sync.map().expect("map").markers[0].0, DEFAULT_COORDINATE);
}

#[test]
fn list_entries_carry_route_and_badge() {
    let mut sync = synchronizer();
    sync.refresh(&default_records());

    let top = &sync.list().expect("list").entries[0];
    assert_eq!(top.route, "Berlin → Poznań");
    assert_eq!(top.status, "Warehouse");
    assert_eq!(top.tone.css_class(), "status-warehouse");
    assert_eq!(top.badge_background, "#f39c1240");
}

#[test]
fn selecting_an_entry_flies_to_it_and_opens_its_popup() {
    let mut sync = synchronizer();
    sync.refresh(&default_records());

    let target = sync
        .select(&ShipmentId::from_number(1002))
        .expect("selection");

    assert_eq!(target, Coordinate::new(50.0647, 19.9450));
    let map = sync.map().expect("map");
    assert_eq!(map.flights, vec![(target, FlyToOptions::default())]);
    assert_eq!(map.flights[0].1.zoom, 10);
    assert_eq!(map.opened, vec![map.handles[1]]);
}

#[test]
fn restored_loose_id_can_be_selected_from_the_list() {
    let records: Vec<ShipmentRecord> = serde_json::from_str(
        r#"[{"id":"legacy-7","status":"Lost","location":"Gdańsk","destination":"Polska","progress":140}]"#,
    )
    .expect("records");
    let mut sync = synchronizer();
    sync.refresh(&records);
    assert_eq!(listed_ids(&sync), vec!["legacy-7"]);

    let target = sync
        .select(&ShipmentId::from("legacy-7"))
        .expect("listed entry is selectable");

    assert_eq!(target, geo::resolve("Gdańsk"));
    let map = sync.map().expect("map");
    assert_eq!(map.opened, vec![map.handles[0]]);
    assert!(sync.select(&ShipmentId::from("legacy-8")).is_none());
}

#[test]
fn select_at_follows_list_position() {
    let mut sync = synchronizer();
    sync.refresh(&default_records());

    let top = sync.select_at(0).expect("top entry");

    assert_eq!(top, Coordinate::new(52.52, 13.405));
    assert_eq!(sync.select_at(3), None);
    assert_eq!(sync.select(&ShipmentId::from_number(9999)), None);
}

#[test]
fn custom_fly_to_options_are_forwarded() {
    let options = FlyToOptions {
        zoom: 12,
        animate: false,
        duration: Duration::from_millis(0),
    };
    let mut sync = synchronizer().with_fly_to(options);
    sync.refresh(&default_records());

    sync.select_at(2).expect("bottom entry");

    assert_eq!(sync.map().expect("map").flights[0].1, options);
}

#[test]
fn missing_list_container_still_draws_markers() {
    let mut sync: ViewSynchronizer<RecordingMap, RecordingList> =
        ViewSynchronizer::new(Some(RecordingMap::default()), None);

    let summary = sync.refresh(&default_records());

    assert_eq!(summary, RenderSummary { markers: 3, entries: 0 });
    assert!(sync.select_at(0).is_some());
}

#[test]
fn missing_map_still_lists_entries_and_ignores_selection() {
    let mut sync: ViewSynchronizer<RecordingMap, RecordingList> =
        ViewSynchronizer::new(None, Some(RecordingList::default()));

    let summary = sync.refresh(&default_records());

    assert_eq!(summary, RenderSummary { markers: 0, entries: 3 });
    assert_eq!(sync.select_at(0), None);
}
