//! Consolidated color tables for the floor plan.
//!
//! Every fill/stroke used by the renderer and rasterizer comes from here, so
//! status colors and kind colors cannot drift between output paths.

use crate::geometry::SeatStatus;
use crate::types::{ElementKind, TableShape, VenueElement};

/// A fill/stroke pair, as hex strings (the renderer emits them verbatim, the
/// rasterizer parses them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fill: &'static str,
    pub stroke: &'static str,
}

pub fn status_color(status: SeatStatus) -> &'static str {
    match status {
        SeatStatus::Empty => "#9ca3af",
        SeatStatus::Partial => "#f59e0b",
        SeatStatus::Full => "#22c55e",
        SeatStatus::OverCapacity => "#ef4444",
    }
}

pub fn table_colors(shape: TableShape) -> ColorPair {
    match shape {
        TableShape::Round => ColorPair { fill: "#fefce8", stroke: "#a16207" },
        TableShape::Rectangular => ColorPair { fill: "#f8fafc", stroke: "#475569" },
        TableShape::Sweetheart => ColorPair { fill: "#fdf2f8", stroke: "#be185d" },
    }
}

pub fn element_colors(kind: ElementKind) -> ColorPair {
    match kind {
        ElementKind::DanceFloor => ColorPair { fill: "#ddd6fe", stroke: "#7c3aed" },
        ElementKind::Stage => ColorPair { fill: "#fecaca", stroke: "#dc2626" },
        ElementKind::Entrance => ColorPair { fill: "#bbf7d0", stroke: "#16a34a" },
        ElementKind::Bar => ColorPair { fill: "#fde68a", stroke: "#d97706" },
        ElementKind::DjBooth => ColorPair { fill: "#c7d2fe", stroke: "#4f46e5" },
        ElementKind::Periquera => ColorPair { fill: "#fed7aa", stroke: "#ea580c" },
        ElementKind::Lounge => ColorPair { fill: "#fbcfe8", stroke: "#db2777" },
        ElementKind::Area => ColorPair { fill: "#f1f5f9", stroke: "#94a3b8" },
        ElementKind::Custom => ColorPair { fill: "#e2e8f0", stroke: "#64748b" },
    }
}

/// Effective fill for an element: the explicit override wins over the
/// kind-derived color.
pub fn element_fill(element: &VenueElement) -> String {
    match &element.color {
        Some(c) => c.clone(),
        None => element_colors(element.kind).fill.to_string(),
    }
}

pub const CHAIR_OCCUPIED: &str = "#4b5563";
pub const CHAIR_EMPTY: &str = "#e5e7eb";
pub const CHAIR_STROKE: &str = "#9ca3af";
pub const GRID_LINE: &str = "#f3f4f6";
pub const CANVAS_BG: &str = "#ffffff";
pub const LABEL_TEXT: &str = "#1f2937";
pub const MUTED_TEXT: &str = "#6b7280";

// Parse a hex color like "#RRGGBB" into 8-bit RGB
pub fn parse_hex_rgb(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementShape, VenueElement};

    #[test]
    fn override_beats_kind_color() {
        let mut el = VenueElement {
            kind: ElementKind::Bar,
            shape: ElementShape::Rect,
            label: None,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rotation: 0.0,
            color: Some("#123456".into()),
        };
        assert_eq!(element_fill(&el), "#123456");
        el.color = None;
        assert_eq!(element_fill(&el), element_colors(ElementKind::Bar).fill);
    }

    #[test]
    fn parse_hex_roundtrip() {
        assert_eq!(parse_hex_rgb("#ef4444"), Some((0xef, 0x44, 0x44)));
        assert_eq!(parse_hex_rgb("22c55e"), Some((0x22, 0xc5, 0x5e)));
        assert_eq!(parse_hex_rgb("#fff"), None);
    }

    #[test]
    fn every_status_has_a_distinct_color() {
        let all = [
            SeatStatus::Empty,
            SeatStatus::Partial,
            SeatStatus::Full,
            SeatStatus::OverCapacity,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(status_color(*a), status_color(*b));
            }
        }
    }
}
