use shared::domain::ShipmentStatus;

/// Three-bucket status classification used for marker and badge colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Delivered,
    Holding,
    Moving,
}

impl StatusTone {
    pub fn for_status(status: &ShipmentStatus) -> Self {
        match status {
            ShipmentStatus::Delivered => StatusTone::Delivered,
            ShipmentStatus::Warehouse | ShipmentStatus::Processing => StatusTone::Holding,
            _ => StatusTone::Moving,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusTone::Delivered => "#2ecc71",
            StatusTone::Holding => "#f39c12",
            StatusTone::Moving => "#00b4d8",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StatusTone::Delivered => "status-delivered",
            StatusTone::Holding => "status-warehouse",
            StatusTone::Moving => "status-transit",
        }
    }

    /// Badge fill: the tone color at 25% alpha.
    pub fn badge_background(self) -> String {
        format!("{}40", self.color())
    }
}
