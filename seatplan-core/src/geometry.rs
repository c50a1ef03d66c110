//! Chair placement and status math. All functions here are total over
//! validated geometry; capacity 0 yields zero chairs.

use crate::types::{Table, TableShape};

/// Spatial padding reserved around a table for chair geometry, in plan units.
pub const CHAIR_CLEARANCE: f64 = 18.0;

/// Visual radius of a chair marker, in plan units.
pub const CHAIR_RADIUS: f64 = 6.0;

/// Four-tier fill classification of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatStatus {
    Empty,
    Partial,
    Full,
    OverCapacity,
}

impl SeatStatus {
    pub fn label(self) -> &'static str {
        match self {
            SeatStatus::Empty => "Empty",
            SeatStatus::Partial => "Partial",
            SeatStatus::Full => "Full",
            SeatStatus::OverCapacity => "Over capacity",
        }
    }
}

/// Classify occupancy against capacity. The over-capacity check runs first:
/// testing equality first would misclassify an over-full table as merely full.
pub fn seat_status(occupancy: u32, capacity: u32) -> SeatStatus {
    if occupancy > capacity {
        SeatStatus::OverCapacity
    } else if occupancy == capacity && capacity > 0 {
        SeatStatus::Full
    } else if occupancy > 0 {
        SeatStatus::Partial
    } else {
        SeatStatus::Empty
    }
}

/// A chair, derived fresh from its table on every render. Coordinates are in
/// the table's local pre-rotation frame; the renderer wraps table plus chairs
/// in one rotation transform about the table center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chair {
    pub x: f64,
    pub y: f64,
    /// Outward facing angle in degrees (0 = up-facing bottom-row chair,
    /// matches its placement angle on round tables).
    pub angle: f64,
    pub occupied: bool,
}

/// Occupied flag per chair ordinal. Guests with an explicit in-range seat
/// claim that chair; the rest fill unclaimed chairs in supplied order.
/// Without explicit seats this reduces to a prefix of length `occupancy()`.
pub fn occupied_flags(table: &Table) -> Vec<bool> {
    let capacity = table.capacity as usize;
    let mut flags = vec![false; capacity];
    let mut unplaced = 0usize;
    for guest in &table.guests {
        match guest.seat {
            Some(n) if n >= 1 && (n as usize) <= capacity && !flags[n as usize - 1] => {
                flags[n as usize - 1] = true;
            }
            // Out-of-range or duplicate claims fall back to ordinal fill
            _ => unplaced += 1,
        }
    }
    for flag in flags.iter_mut() {
        if unplaced == 0 {
            break;
        }
        if !*flag {
            *flag = true;
            unplaced -= 1;
        }
    }
    flags
}

/// Compute chair positions for a table in its local (pre-rotation) frame.
pub fn chair_positions(table: &Table) -> Vec<Chair> {
    let capacity = table.capacity as usize;
    if capacity == 0 {
        return Vec::new();
    }
    let occupied = occupied_flags(table);

    match table.shape {
        TableShape::Round => {
            let (cx, cy) = table.center();
            let radius = table.width / 2.0 + CHAIR_CLEARANCE;
            let step = 360.0 / capacity as f64;
            (0..capacity)
                .map(|i| {
                    // Start at the top, proceed clockwise (screen y grows down)
                    let angle = -90.0 + i as f64 * step;
                    let rad = angle.to_radians();
                    Chair {
                        x: cx + radius * rad.cos(),
                        y: cy + radius * rad.sin(),
                        angle,
                        occupied: occupied[i],
                    }
                })
                .collect()
        }
        TableShape::Rectangular => {
            let side_a = capacity.div_ceil(2);
            let side_b = capacity / 2;
            let mut chairs = Vec::with_capacity(capacity);
            for i in 0..side_a {
                chairs.push(Chair {
                    x: table.x + table.width * (i + 1) as f64 / (side_a + 1) as f64,
                    y: table.y - CHAIR_CLEARANCE,
                    angle: 180.0,
                    occupied: occupied[i],
                });
            }
            for i in 0..side_b {
                chairs.push(Chair {
                    x: table.x + table.width * (i + 1) as f64 / (side_b + 1) as f64,
                    y: table.y + table.height + CHAIR_CLEARANCE,
                    angle: 0.0,
                    occupied: occupied[side_a + i],
                });
            }
            chairs
        }
        TableShape::Sweetheart => (0..capacity)
            .map(|i| Chair {
                x: table.x + table.width * (i + 1) as f64 / (capacity + 1) as f64,
                y: table.y - CHAIR_CLEARANCE,
                angle: 180.0,
                occupied: occupied[i],
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GuestStatus, SeatedGuest};

    fn guest(name: &str, seat: Option<u32>) -> SeatedGuest {
        SeatedGuest {
            name: name.into(),
            group: None,
            status: GuestStatus::Confirmed,
            dietary: None,
            dish: None,
            seat,
        }
    }

    fn table(shape: TableShape, capacity: u32, occupancy: u32) -> Table {
        Table {
            number: 1,
            name: "T1".into(),
            shape,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 60.0,
            rotation: 0.0,
            capacity,
            guests: (0..occupancy).map(|i| guest(&format!("g{}", i), None)).collect(),
        }
    }

    #[test]
    fn chair_count_equals_capacity() {
        for shape in [TableShape::Round, TableShape::Rectangular, TableShape::Sweetheart] {
            for capacity in [0u32, 1, 2, 5, 8, 13] {
                let t = table(shape, capacity, 0);
                assert_eq!(chair_positions(&t).len(), capacity as usize);
            }
        }
    }

    #[test]
    fn occupied_is_a_prefix_without_explicit_seats() {
        let t = table(TableShape::Rectangular, 8, 3);
        let chairs = chair_positions(&t);
        for (i, chair) in chairs.iter().enumerate() {
            assert_eq!(chair.occupied, i < 3, "chair {}", i);
        }
    }

    #[test]
    fn status_transitions_in_order() {
        let c = 4;
        assert_eq!(seat_status(0, c), SeatStatus::Empty);
        assert_eq!(seat_status(1, c), SeatStatus::Partial);
        assert_eq!(seat_status(3, c), SeatStatus::Partial);
        assert_eq!(seat_status(4, c), SeatStatus::Full);
        assert_eq!(seat_status(5, c), SeatStatus::OverCapacity);
        assert_eq!(seat_status(100, c), SeatStatus::OverCapacity);
    }

    #[test]
    fn zero_capacity_is_empty_until_occupied() {
        assert_eq!(seat_status(0, 0), SeatStatus::Empty);
        assert_eq!(seat_status(1, 0), SeatStatus::OverCapacity);
    }

    #[test]
    fn round_table_of_eight_sits_at_45_degree_steps() {
        let t = table(TableShape::Round, 8, 8);
        let chairs = chair_positions(&t);
        assert_eq!(chairs.len(), 8);
        for (i, chair) in chairs.iter().enumerate() {
            let expected = -90.0 + 45.0 * i as f64;
            assert!((chair.angle - expected).abs() < 1e-9);
            assert!(chair.occupied);
            // On the clearance ring around the body
            let (cx, cy) = t.center();
            let r = ((chair.x - cx).powi(2) + (chair.y - cy).powi(2)).sqrt();
            assert!((r - (50.0 + CHAIR_CLEARANCE)).abs() < 1e-9);
        }
        assert_eq!(seat_status(t.occupancy(), t.capacity), SeatStatus::Full);
        // First chair is at the top of the circle
        assert!((chairs[0].x - 50.0).abs() < 1e-9);
        assert!(chairs[0].y < 0.0);
    }

    #[test]
    fn rectangular_capacity_five_splits_three_two() {
        let t = table(TableShape::Rectangular, 5, 3);
        let chairs = chair_positions(&t);
        assert_eq!(chairs.len(), 5);
        // Chairs 0..=2 on the top edge, 3..=4 on the bottom edge
        for chair in &chairs[..3] {
            assert!((chair.y - (t.y - CHAIR_CLEARANCE)).abs() < 1e-9);
            assert_eq!(chair.angle, 180.0);
        }
        for chair in &chairs[3..] {
            assert!((chair.y - (t.y + t.height + CHAIR_CLEARANCE)).abs() < 1e-9);
            assert_eq!(chair.angle, 0.0);
        }
        // Fractional distribution along the width: (i+1)/(n+1)
        assert!((chairs[0].x - 25.0).abs() < 1e-9);
        assert!((chairs[1].x - 50.0).abs() < 1e-9);
        assert!((chairs[2].x - 75.0).abs() < 1e-9);
        assert!((chairs[3].x - 100.0 / 3.0).abs() < 1e-9);
        // Occupancy 3 fills the top row only
        assert!(chairs[..3].iter().all(|c| c.occupied));
        assert!(chairs[3..].iter().all(|c| !c.occupied));
    }

    #[test]
    fn sweetheart_chairs_sit_on_top_edge_only() {
        let t = table(TableShape::Sweetheart, 2, 2);
        let chairs = chair_positions(&t);
        assert_eq!(chairs.len(), 2);
        assert!(chairs.iter().all(|c| (c.y - (t.y - CHAIR_CLEARANCE)).abs() < 1e-9));
        assert!(chairs.iter().all(|c| c.angle == 180.0));
    }

    #[test]
    fn over_capacity_keeps_chair_array_capacity_bound() {
        let t = table(TableShape::Round, 4, 6);
        let chairs = chair_positions(&t);
        assert_eq!(chairs.len(), 4);
        assert!(chairs.iter().all(|c| c.occupied));
        assert_eq!(seat_status(t.occupancy(), t.capacity), SeatStatus::OverCapacity);
    }

    #[test]
    fn explicit_seat_claims_override_ordinal_fill() {
        let mut t = table(TableShape::Rectangular, 4, 0);
        t.guests = vec![guest("a", Some(4)), guest("b", None)];
        let flags = occupied_flags(&t);
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn bad_seat_claims_fall_back_to_ordinal() {
        let mut t = table(TableShape::Rectangular, 3, 0);
        // seat 9 is out of range, the duplicate claim on 1 overflows to ordinal
        t.guests = vec![guest("a", Some(1)), guest("b", Some(1)), guest("c", Some(9))];
        let flags = occupied_flags(&t);
        assert_eq!(flags, vec![true, true, true]);
    }
}
