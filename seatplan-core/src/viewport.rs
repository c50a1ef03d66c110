//! Viewport fitting: one axis-aligned box that tightly bounds every table
//! (chair clearance included) and venue element, plus a border margin, with a
//! scale factor onto a target output width.

use crate::types::{Table, VenueElement};

/// Minimum derived output height, to avoid a degenerate near-zero canvas for
/// very wide, very short content.
pub const MIN_OUTPUT_HEIGHT: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn of_table(table: &Table, chair_clearance: f64) -> Self {
        let (ex, ey) = table.extent();
        BoundingBox {
            min_x: table.x - chair_clearance,
            min_y: table.y - chair_clearance,
            max_x: table.x + ex + chair_clearance,
            max_y: table.y + ey + chair_clearance,
        }
    }

    pub fn of_element(element: &VenueElement) -> Self {
        BoundingBox {
            min_x: element.x,
            min_y: element.y,
            max_x: element.x + element.width,
            max_y: element.y + element.height,
        }
    }

    fn merge(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }
}

/// Fitted viewport: origin and extent in plan units, scale in output pixels
/// per plan unit, and the derived output canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub output_width: f64,
    pub output_height: f64,
}

impl Viewport {
    /// True when the box lies fully inside the viewport.
    pub fn contains(&self, b: &BoundingBox) -> bool {
        b.min_x >= self.origin_x - 1e-9
            && b.min_y >= self.origin_y - 1e-9
            && b.max_x <= self.origin_x + self.width + 1e-9
            && b.max_y <= self.origin_y + self.height + 1e-9
    }
}

/// Fit all content into a canvas of `target_width` output pixels. Returns
/// `None` for an empty plan; the caller renders an explicit no-data state
/// instead of a zero-size viewport.
pub fn fit(
    tables: &[Table],
    elements: &[VenueElement],
    chair_clearance: f64,
    border: f64,
    target_width: f64,
) -> Option<Viewport> {
    let mut boxes = tables
        .iter()
        .map(|t| BoundingBox::of_table(t, chair_clearance))
        .chain(elements.iter().map(BoundingBox::of_element));

    let mut bounds = boxes.next()?;
    for b in boxes {
        bounds.merge(&b);
    }

    let origin_x = bounds.min_x - border;
    let origin_y = bounds.min_y - border;
    let width = bounds.max_x + border - origin_x;
    let height = bounds.max_y + border - origin_y;

    let scale = target_width / width;
    let output_height = (target_width * height / width).max(MIN_OUTPUT_HEIGHT);

    log::debug!(
        "viewport fit: origin=({:.1},{:.1}) extent={:.1}x{:.1} scale={:.3}",
        origin_x, origin_y, width, height, scale
    );

    Some(Viewport {
        origin_x,
        origin_y,
        width,
        height,
        scale,
        output_width: target_width,
        output_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CHAIR_CLEARANCE;
    use crate::types::{ElementKind, ElementShape, TableShape};

    fn table(x: f64, y: f64, w: f64, h: f64) -> Table {
        Table {
            number: 1,
            name: "T".into(),
            shape: TableShape::Rectangular,
            x,
            y,
            width: w,
            height: h,
            rotation: 0.0,
            capacity: 4,
            guests: Vec::new(),
        }
    }

    fn element(x: f64, y: f64, w: f64, h: f64) -> VenueElement {
        VenueElement {
            kind: ElementKind::DanceFloor,
            shape: ElementShape::Rect,
            label: None,
            x,
            y,
            width: w,
            height: h,
            rotation: 0.0,
            color: None,
        }
    }

    #[test]
    fn empty_plan_yields_no_viewport() {
        assert!(fit(&[], &[], CHAIR_CLEARANCE, 20.0, 1000.0).is_none());
    }

    #[test]
    fn all_boxes_are_contained_after_fitting() {
        let tables = vec![table(0.0, 0.0, 100.0, 60.0), table(400.0, 250.0, 80.0, 80.0)];
        let elements = vec![element(-50.0, 120.0, 200.0, 150.0)];
        let vp = fit(&tables, &elements, CHAIR_CLEARANCE, 20.0, 1000.0).unwrap();
        for t in &tables {
            assert!(vp.contains(&BoundingBox::of_table(t, CHAIR_CLEARANCE)));
        }
        for e in &elements {
            assert!(vp.contains(&BoundingBox::of_element(e)));
        }
    }

    #[test]
    fn round_table_bound_is_square_on_width() {
        let mut t = table(0.0, 0.0, 100.0, 40.0);
        t.shape = TableShape::Round;
        let b = BoundingBox::of_table(&t, 10.0);
        assert_eq!(b.max_y - b.min_y, 120.0); // width-derived, not the stale height
        assert_eq!(b.max_x - b.min_x, 120.0);
    }

    #[test]
    fn border_pads_both_sides() {
        let tables = vec![table(0.0, 0.0, 100.0, 60.0)];
        let vp = fit(&tables, &[], 0.0, 25.0, 500.0).unwrap();
        assert_eq!(vp.origin_x, -25.0);
        assert_eq!(vp.origin_y, -25.0);
        assert_eq!(vp.width, 150.0);
        assert_eq!(vp.height, 110.0);
        assert!((vp.scale - 500.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn output_height_is_floored_for_wide_short_plans() {
        // 1000x20 content would map to a 20px-tall canvas at width 1000
        let elements = vec![element(0.0, 0.0, 1000.0, 20.0)];
        let vp = fit(&[], &elements, 0.0, 0.0, 1000.0).unwrap();
        assert_eq!(vp.output_height, MIN_OUTPUT_HEIGHT);
    }

    #[test]
    fn aspect_ratio_is_preserved_above_the_floor() {
        let elements = vec![element(0.0, 0.0, 400.0, 300.0)];
        let vp = fit(&[], &elements, 0.0, 0.0, 800.0).unwrap();
        assert!((vp.output_height - 600.0).abs() < 1e-9);
    }
}
