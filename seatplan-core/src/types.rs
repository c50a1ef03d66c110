use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Table body shape. Closed set: adding a shape is a compile-time change in
/// every match over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableShape {
    Round,
    Rectangular,
    Sweetheart,
}

/// Decorative venue element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    DanceFloor,
    Stage,
    Entrance,
    Bar,
    DjBooth,
    Periquera,
    Lounge,
    Area,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementShape {
    Rect,
    Circle,
}

/// RSVP status of a seated guest. Only used for roster rows; chair occupancy
/// is ordinal, not status-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestStatus {
    Confirmed,
    Pending,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatedGuest {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default = "default_guest_status")]
    pub status: GuestStatus,
    #[serde(default)]
    pub dietary: Option<String>,
    #[serde(default)]
    pub dish: Option<String>,
    /// Explicit 1-based seat claim. When present and within capacity it
    /// overrides ordinal placement; see `geometry::occupied_flags`.
    #[serde(default)]
    pub seat: Option<u32>,
}

fn default_guest_status() -> GuestStatus {
    GuestStatus::Confirmed
}

/// One table in the plan. Immutable for the duration of a render pass;
/// occupancy is always derived from the guest list, never stored, so the
/// rendered chair layout cannot drift from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub number: u32,
    pub name: String,
    pub shape: TableShape,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, pivot at the table center.
    #[serde(default)]
    pub rotation: f64,
    pub capacity: u32,
    #[serde(default)]
    pub guests: Vec<SeatedGuest>,
}

impl Table {
    pub fn occupancy(&self) -> u32 {
        self.guests.len() as u32
    }

    /// Center of rotation. Round tables use a square bound of side `width`,
    /// so their center ignores the stored height.
    pub fn center(&self) -> (f64, f64) {
        match self.shape {
            TableShape::Round => (self.x + self.width / 2.0, self.y + self.width / 2.0),
            _ => (self.x + self.width / 2.0, self.y + self.height / 2.0),
        }
    }

    /// Extent of the table body itself, before chair clearance.
    pub fn extent(&self) -> (f64, f64) {
        match self.shape {
            TableShape::Round => (self.width, self.width),
            _ => (self.width, self.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueElement {
    pub kind: ElementKind,
    pub shape: ElementShape,
    #[serde(default)]
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    /// Explicit fill override; wins over the kind-derived color.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub couple: String,
    #[serde(default)]
    pub date: Option<String>,
    /// Identifier used to derive the export filename.
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanStats {
    pub guest_count: u32,
    pub table_count: u32,
}

/// Read-only snapshot handed in by the data-fetching layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanSnapshot {
    pub event: EventInfo,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub elements: Vec<VenueElement>,
    #[serde(default)]
    pub stats: PlanStats,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("duplicate table number {0}")]
    DuplicateTableNumber(u32),
    #[error("table {number} has non-positive dimensions {width}x{height}")]
    BadDimensions { number: u32, width: f64, height: f64 },
    #[error("element '{0}' has non-positive dimensions")]
    BadElementDimensions(String),
}

impl FloorPlanSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.elements.is_empty()
    }

    /// Validate structural invariants of an upstream snapshot. Overfilled
    /// tables (occupancy > capacity) are a renderable state, not an error.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.number) {
                return Err(SnapshotError::DuplicateTableNumber(table.number));
            }
            if table.width <= 0.0 || table.height <= 0.0 {
                return Err(SnapshotError::BadDimensions {
                    number: table.number,
                    width: table.width,
                    height: table.height,
                });
            }
        }
        for element in &self.elements {
            if element.width <= 0.0 || element.height <= 0.0 {
                return Err(SnapshotError::BadElementDimensions(
                    element.label.clone().unwrap_or_else(|| format!("{:?}", element.kind)),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_table(number: u32) -> Table {
        Table {
            number,
            name: format!("Table {}", number),
            shape: TableShape::Round,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            capacity: 8,
            guests: Vec::new(),
        }
    }

    #[test]
    fn occupancy_tracks_guest_list() {
        let mut t = round_table(1);
        assert_eq!(t.occupancy(), 0);
        t.guests.push(SeatedGuest {
            name: "Ana".into(),
            group: None,
            status: GuestStatus::Confirmed,
            dietary: None,
            dish: None,
            seat: None,
        });
        assert_eq!(t.occupancy(), 1);
    }

    #[test]
    fn round_center_uses_width_for_both_axes() {
        let mut t = round_table(1);
        t.height = 40.0; // stale stored height must not matter
        assert_eq!(t.center(), (50.0, 50.0));
        assert_eq!(t.extent(), (100.0, 100.0));
    }

    #[test]
    fn validate_rejects_duplicate_numbers() {
        let snap = FloorPlanSnapshot {
            event: EventInfo { couple: "A & B".into(), date: None, slug: "a-b".into() },
            tables: vec![round_table(3), round_table(3)],
            elements: Vec::new(),
            stats: PlanStats::default(),
        };
        assert!(matches!(snap.validate(), Err(SnapshotError::DuplicateTableNumber(3))));
    }

    #[test]
    fn snapshot_deserializes_with_snake_case_tags() {
        let json = r#"{
            "event": {"couple": "Mar & Leo", "slug": "mar-leo"},
            "tables": [{
                "number": 1, "name": "Familia", "shape": "sweetheart",
                "x": 10, "y": 20, "width": 80, "height": 50, "capacity": 2
            }],
            "elements": [{
                "kind": "dance_floor", "shape": "rect",
                "x": 0, "y": 0, "width": 200, "height": 200
            }]
        }"#;
        let snap: FloorPlanSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.tables[0].shape, TableShape::Sweetheart);
        assert_eq!(snap.elements[0].kind, ElementKind::DanceFloor);
        assert!(snap.validate().is_ok());
    }
}
