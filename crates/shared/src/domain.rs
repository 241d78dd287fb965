use std::fmt;

use serde::{Deserialize, Serialize};

pub const SHIPMENT_ID_PREFIX: &str = "PK-";

/// Tracking number in the `PK-####` form.
///
/// Uniqueness and format are conventions only: values read back from storage
/// are accepted verbatim, and [`ShipmentId::is_well_formed`] reports whether
/// the convention holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(String);

impl ShipmentId {
    pub fn from_number(number: u16) -> Self {
        Self(format!("{SHIPMENT_ID_PREFIX}{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn number(&self) -> Option<u16> {
        if !self.is_well_formed() {
            return None;
        }
        self.0[SHIPMENT_ID_PREFIX.len()..].parse().ok()
    }

    pub fn is_well_formed(&self) -> bool {
        match self.0.strip_prefix(SHIPMENT_ID_PREFIX) {
            Some(digits) => digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

/// Wraps any text as an id without checking the `PK-####` form, for lookups
/// against records that were restored as-is.
impl From<&str> for ShipmentId {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Shipment status. The set is open: anything the page does not know about
/// is carried through as [`ShipmentStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentStatus {
    InTransit,
    Delivered,
    Warehouse,
    Processing,
    Customs,
    Other(String),
}

impl ShipmentStatus {
    pub fn label(&self) -> &str {
        match self {
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Warehouse => "Warehouse",
            ShipmentStatus::Processing => "Processing",
            ShipmentStatus::Customs => "Customs",
            ShipmentStatus::Other(label) => label,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered)
    }
}

impl From<String> for ShipmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "In Transit" => ShipmentStatus::InTransit,
            "Delivered" => ShipmentStatus::Delivered,
            "Warehouse" => ShipmentStatus::Warehouse,
            "Processing" => ShipmentStatus::Processing,
            "Customs" => ShipmentStatus::Customs,
            _ => ShipmentStatus::Other(value),
        }
    }
}

impl From<&str> for ShipmentStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ShipmentStatus> for String {
    fn from(value: ShipmentStatus) -> Self {
        match value {
            ShipmentStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub id: ShipmentId,
    pub status: ShipmentStatus,
    pub location: String,
    pub destination: String,
    pub progress: u8,
}

impl ShipmentRecord {
    pub fn new(
        id: ShipmentId,
        status: impl Into<ShipmentStatus>,
        location: impl Into<String>,
        destination: impl Into<String>,
        progress: u8,
    ) -> Self {
        Self {
            id,
            status: status.into(),
            location: location.into(),
            destination: destination.into(),
            progress,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_delivered()
    }

    pub fn route(&self) -> String {
        format!("{} → {}", self.location, self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FleetStats {
    pub total: usize,
    pub active: usize,
}

impl FleetStats {
    pub fn from_records(records: &[ShipmentRecord]) -> Self {
        Self {
            total: records.len(),
            active: records.iter().filter(|record| record.is_active()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_id_format_checks() {
        assert!(ShipmentId::from_number(1001).is_well_formed());
        assert_eq!(ShipmentId::from_number(4242).number(), Some(4242));
        assert!(!ShipmentId::from("PK-12").is_well_formed());
        assert!(!ShipmentId::from("XX-1234").is_well_formed());
        assert_eq!(ShipmentId::from(" PK-0420 ").number(), Some(420));
    }

    #[test]
    fn loose_ids_convert_without_validation() {
        let id = ShipmentId::from(" legacy-7 ");
        assert_eq!(id.as_str(), "legacy-7");
        assert!(!id.is_well_formed());
        assert_eq!(id.number(), None);
        assert_eq!(ShipmentId::from("PK-1001"), ShipmentId::from_number(1001));
    }

    #[test]
    fn unknown_status_survives_serialization() {
        let status: ShipmentStatus =
            serde_json::from_str("\"Returned to sender\"").expect("status");
        assert_eq!(
            status,
            ShipmentStatus::Other("Returned to sender".to_string())
        );
        assert_eq!(
            serde_json::to_string(&status).expect("json"),
            "\"Returned to sender\""
        );
    }

    #[test]
    fn record_uses_plain_field_names_on_the_wire() {
        let record = ShipmentRecord::new(
            ShipmentId::from_number(1001),
            ShipmentStatus::InTransit,
            "Warszawa",
            "Gdańsk",
            45,
        );
        let value = serde_json::to_value(&record).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "PK-1001",
                "status": "In Transit",
                "location": "Warszawa",
                "destination": "Gdańsk",
                "progress": 45
            })
        );
    }

    #[test]
    fn stats_count_everything_not_delivered_as_active() {
        let records = vec![
            ShipmentRecord::new(ShipmentId::from_number(1), "Delivered", "a", "b", 100),
            ShipmentRecord::new(ShipmentId::from_number(2), "Customs", "a", "b", 5),
            ShipmentRecord::new(ShipmentId::from_number(3), "Lost", "a", "b", 0),
        ];
        assert_eq!(
            FleetStats::from_records(&records),
            FleetStats {
                total: 3,
                active: 2
            }
        );
    }
}
