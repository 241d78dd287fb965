//! Fixed city directory used to place shipments on the map.

use shared::domain::Coordinate;

/// Geographic center of Poland, used for any location the directory lacks.
pub const DEFAULT_COORDINATE: Coordinate = Coordinate::new(52.0693, 19.4803);

const CITY_COORDINATES: [(&str, Coordinate); 11] = [
    ("Warszawa", Coordinate::new(52.2297, 21.0122)),
    ("Kraków", Coordinate::new(50.0647, 19.9450)),
    ("Gdańsk", Coordinate::new(54.3520, 18.6466)),
    ("Poznań", Coordinate::new(52.4064, 16.9252)),
    ("Wrocław", Coordinate::new(51.1079, 17.0385)),
    ("Łódź", Coordinate::new(51.7592, 19.4560)),
    ("Szczecin", Coordinate::new(53.4285, 14.5528)),
    ("Berlin", Coordinate::new(52.5200, 13.4050)),
    ("Paryż", Coordinate::new(48.8566, 2.3522)),
    ("Madryt", Coordinate::new(40.4168, -3.7038)),
    ("Rzym", Coordinate::new(41.9028, 12.4964)),
];

pub fn known_cities() -> impl Iterator<Item = &'static str> {
    CITY_COORDINATES.iter().map(|(name, _)| *name)
}

pub fn lookup(location: &str) -> Option<Coordinate> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, coordinate)| *coordinate)
}

pub fn resolve(location: &str) -> Coordinate {
    lookup(location).unwrap_or(DEFAULT_COORDINATE)
}
