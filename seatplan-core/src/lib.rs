//! Seatplan Core Library
//!
//! Venue data model, chair geometry, viewport fitting, color tables, and the
//! pagination slicer for Seatplan floor plans.

pub mod types;
pub mod palette;
pub mod geometry;
pub mod viewport;
pub mod paginate;

// Re-export commonly used types and functions
pub use types::{
    ElementKind, ElementShape, EventInfo, FloorPlanSnapshot, PlanStats, SeatedGuest, Table,
    TableShape, VenueElement,
};
pub use geometry::{chair_positions, seat_status, Chair, SeatStatus};
pub use viewport::{fit, BoundingBox, Viewport};
pub use paginate::{paginate, PageSlice, SliceParams};
