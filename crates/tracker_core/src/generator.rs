use std::ops::RangeInclusive;

use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use shared::domain::{ShipmentId, ShipmentRecord, ShipmentStatus};

pub const GENERATED_STATUSES: [ShipmentStatus; 3] = [
    ShipmentStatus::InTransit,
    ShipmentStatus::Processing,
    ShipmentStatus::Customs,
];
pub const GENERATED_LOCATIONS: [&str; 6] =
    ["Wrocław", "Łódź", "Szczecin", "Paryż", "Madryt", "Rzym"];
pub const PLACEHOLDER_DESTINATION: &str = "Polska";
/// Exclusive upper bound for generated progress.
pub const GENERATED_PROGRESS_CEILING: u8 = 80;
pub const ID_NUMBER_RANGE: RangeInclusive<u16> = 1000..=9999;

/// Source of fabricated shipments. The store asks for ids separately so it
/// can redraw on collision without rerolling the rest of the record.
pub trait RecordSource: Send {
    fn draw_id(&mut self) -> ShipmentId;
    fn draw_record(&mut self, id: ShipmentId) -> ShipmentRecord;
}

pub struct RandomRecordSource {
    rng: StdRng,
}

impl RandomRecordSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for RandomRecordSource {
    fn draw_id(&mut self) -> ShipmentId {
        ShipmentId::from_number(self.rng.random_range(ID_NUMBER_RANGE))
    }

    fn draw_record(&mut self, id: ShipmentId) -> ShipmentRecord {
        let status = GENERATED_STATUSES
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or(ShipmentStatus::InTransit);
        let location = GENERATED_LOCATIONS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(GENERATED_LOCATIONS[0]);
        let progress = self.rng.random_range(0..GENERATED_PROGRESS_CEILING);

        ShipmentRecord::new(id, status, location, PLACEHOLDER_DESTINATION, progress)
    }
}

/// Starter set written the first time a store finds nothing usable.
pub fn default_records() -> Vec<ShipmentRecord> {
    vec![
        ShipmentRecord::new(
            ShipmentId::from_number(1001),
            ShipmentStatus::InTransit,
            "Warszawa",
            "Gdańsk",
            45,
        ),
        ShipmentRecord::new(
            ShipmentId::from_number(1002),
            ShipmentStatus::Delivered,
            "Kraków",
            "Kraków",
            100,
        ),
        ShipmentRecord::new(
            ShipmentId::from_number(1003),
            ShipmentStatus::Warehouse,
            "Berlin",
            "Poznań",
            10,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_records_stay_inside_generator_sets() {
        let mut source = RandomRecordSource::seeded(7);
        for _ in 0..500 {
            let id = source.draw_id();
            assert!(id.is_well_formed(), "unexpected id {id}");
            assert!(ID_NUMBER_RANGE.contains(&id.number().expect("numeric id")));

            let record = source.draw_record(id);
            assert!(record.progress < GENERATED_PROGRESS_CEILING);
            assert!(GENERATED_STATUSES.contains(&record.status));
            assert!(GENERATED_LOCATIONS.contains(&record.location.as_str()));
            assert_eq!(record.destination, PLACEHOLDER_DESTINATION);
        }
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut left = RandomRecordSource::seeded(42);
        let mut right = RandomRecordSource::seeded(42);
        for _ in 0..10 {
            let (left_id, right_id) = (left.draw_id(), right.draw_id());
            assert_eq!(left_id, right_id);
            assert_eq!(left.draw_record(left_id), right.draw_record(right_id));
        }
    }

    #[test]
    fn defaults_are_the_three_starter_shipments() {
        let ids: Vec<String> = default_records()
            .iter()
            .map(|record| record.id.to_string())
            .collect();
        assert_eq!(ids, ["PK-1001", "PK-1002", "PK-1003"]);
    }
}
