//! On-screen vector scene: the floor plan as an SVG document with a fitted
//! viewBox, status coloring, and a legend.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use seatplan_core::geometry::{self, CHAIR_CLEARANCE, CHAIR_RADIUS};
use seatplan_core::palette;
use seatplan_core::types::{ElementKind, ElementShape, FloorPlanSnapshot, Table, TableShape, VenueElement};
use seatplan_core::viewport::{self, Viewport};

/// Render configuration
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output canvas width in pixels; height follows the fitted aspect ratio.
    pub target_width: f64,
    /// Fixed margin around the fitted content, in plan units.
    pub border: f64,
    /// Grid line spacing, in plan units.
    pub grid_step: f64,
    /// Elements narrower than this (in output pixels) get no text label.
    pub min_label_px: f64,
    pub min_font_px: f64,
    pub max_font_px: f64,
    pub font_family: String,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_width: 1240.0,
            border: 24.0,
            grid_step: 50.0,
            min_label_px: 28.0,
            min_font_px: 10.0,
            max_font_px: 16.0,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            show_grid: true,
            show_legend: true,
        }
    }
}

/// Floor-plan scene renderer
pub struct FloorPlanRenderer {
    options: RenderOptions,
}

impl FloorPlanRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Fit the viewport and render the full scene. An empty plan renders the
    /// explicit no-data state instead of a zero-size viewport.
    pub fn render(&self, snapshot: &FloorPlanSnapshot) -> String {
        match viewport::fit(
            &snapshot.tables,
            &snapshot.elements,
            CHAIR_CLEARANCE,
            self.options.border,
            self.options.target_width,
        ) {
            Some(vp) => self.render_scene(snapshot, &vp),
            None => self.render_empty_state(),
        }
    }

    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        snapshot: &FloorPlanSnapshot,
    ) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render(snapshot).as_bytes())
    }

    fn render_empty_state(&self) -> String {
        let w = self.options.target_width;
        let h = viewport::MIN_OUTPUT_HEIGHT;
        let mut svg = SvgBuilder::new(w, h, 0.0, 0.0, w, h, 1.0, &self.options);
        svg.add_background();
        svg.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="16px" text-anchor="middle" fill="{}">No venue data</text>"#,
            w / 2.0,
            h / 2.0,
            self.options.font_family,
            palette::MUTED_TEXT
        ));
        svg.finish()
    }

    fn render_scene(&self, snapshot: &FloorPlanSnapshot, vp: &Viewport) -> String {
        let mut svg = SvgBuilder::new(
            vp.output_width,
            vp.output_height,
            vp.origin_x,
            vp.origin_y,
            vp.width,
            vp.height,
            vp.scale,
            &self.options,
        );
        svg.add_background();
        if self.options.show_grid {
            svg.add_grid();
        }
        // Elements sit under the tables
        for element in &snapshot.elements {
            svg.add_element(element);
        }
        for table in &snapshot.tables {
            svg.add_table(table);
        }
        if self.options.show_legend {
            svg.add_legend(snapshot.tables.len(), snapshot.elements.len());
        }
        svg.finish()
    }
}

/// SVG builder working in plan units; the viewBox maps plan units onto the
/// output canvas. Pixel-sized details (fonts, strokes) divide by `scale`.
struct SvgBuilder {
    elements: Vec<String>,
    out_width: f64,
    out_height: f64,
    origin_x: f64,
    origin_y: f64,
    width: f64,
    height: f64,
    scale: f64,
    options: RenderOptions,
}

impl SvgBuilder {
    #[allow(clippy::too_many_arguments)]
    fn new(
        out_width: f64,
        out_height: f64,
        origin_x: f64,
        origin_y: f64,
        width: f64,
        height: f64,
        scale: f64,
        options: &RenderOptions,
    ) -> Self {
        Self {
            elements: Vec::new(),
            out_width,
            out_height,
            origin_x,
            origin_y,
            width,
            height,
            scale,
            options: options.clone(),
        }
    }

    /// A length given in output pixels, expressed in plan units.
    fn px(&self, v: f64) -> f64 {
        v / self.scale
    }

    fn add_background(&mut self) {
        self.elements.push(format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.origin_x, self.origin_y, self.width, self.height, palette::CANVAS_BG
        ));
    }

    fn add_grid(&mut self) {
        let step = self.options.grid_step;
        let stroke = self.px(1.0);
        let mut x = (self.origin_x / step).ceil() * step;
        while x <= self.origin_x + self.width {
            self.elements.push(format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.3}"/>"#,
                x, self.origin_y, x, self.origin_y + self.height, palette::GRID_LINE, stroke
            ));
            x += step;
        }
        let mut y = (self.origin_y / step).ceil() * step;
        while y <= self.origin_y + self.height {
            self.elements.push(format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.3}"/>"#,
                self.origin_x, y, self.origin_x + self.width, y, palette::GRID_LINE, stroke
            ));
            y += step;
        }
    }

    fn font_size_for(&self, width: f64) -> f64 {
        let px = (width * self.scale * 0.14)
            .clamp(self.options.min_font_px, self.options.max_font_px);
        self.px(px)
    }

    fn add_element(&mut self, element: &VenueElement) {
        let cx = element.x + element.width / 2.0;
        let cy = element.y + element.height / 2.0;
        let fill = palette::element_fill(element);
        let stroke = palette::element_colors(element.kind).stroke;
        let stroke_w = self.px(1.5);

        self.elements.push(format!(
            r#"<g transform="rotate({:.2} {:.2} {:.2})">"#,
            element.rotation, cx, cy
        ));

        match element.shape {
            ElementShape::Rect => self.elements.push(format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
                element.x, element.y, element.width, element.height,
                self.px(4.0), fill, stroke, stroke_w
            )),
            ElementShape::Circle => self.elements.push(format!(
                r#"<ellipse cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
                cx, cy, element.width / 2.0, element.height / 2.0, fill, stroke, stroke_w
            )),
        }

        self.add_element_decoration(element, stroke);
        self.add_element_label(element);
        self.elements.push("</g>".to_string());
    }

    fn add_element_decoration(&mut self, element: &VenueElement, stroke: &str) {
        match element.kind {
            ElementKind::Lounge => {
                // Sofa outline: inset seat plus a back rail along the top
                let inset = (element.width.min(element.height) * 0.18).max(4.0);
                self.elements.push(format!(
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="none" stroke="{}" stroke-width="{:.3}"/>"#,
                    element.x + inset,
                    element.y + inset,
                    element.width - 2.0 * inset,
                    element.height - 2.0 * inset,
                    self.px(3.0),
                    stroke,
                    self.px(1.0)
                ));
                self.elements.push(format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.3}"/>"#,
                    element.x + inset,
                    element.y + inset * 1.6,
                    element.x + element.width - inset,
                    element.y + inset * 1.6,
                    stroke,
                    self.px(1.0)
                ));
            }
            ElementKind::Periquera => {
                // Ring of stool markers around the standing table
                let cx = element.x + element.width / 2.0;
                let cy = element.y + element.height / 2.0;
                let radius = element.width.min(element.height) / 2.0 + self.px(8.0);
                let stools = 4;
                for i in 0..stools {
                    let angle = (-90.0 + i as f64 * 360.0 / stools as f64).to_radians();
                    self.elements.push(format!(
                        r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{:.3}"/>"#,
                        cx + radius * angle.cos(),
                        cy + radius * angle.sin(),
                        self.px(4.0),
                        stroke,
                        self.px(1.0)
                    ));
                }
            }
            ElementKind::Area => {}
            _ => {
                // Short front-indicator bar to show facing direction
                self.elements.push(format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.3}" stroke-linecap="round"/>"#,
                    element.x + element.width * 0.3,
                    element.y + self.px(4.0),
                    element.x + element.width * 0.7,
                    element.y + self.px(4.0),
                    stroke,
                    self.px(3.0)
                ));
            }
        }
    }

    fn add_element_label(&mut self, element: &VenueElement) {
        let Some(label) = &element.label else { return };
        if element.width * self.scale < self.options.min_label_px {
            return;
        }
        let font = self.font_size_for(element.width);
        match element.kind {
            // Area labels hug the top-left so the region reads as a zone
            ElementKind::Area => self.elements.push(format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="start" fill="{}">{}</text>"#,
                element.x + self.px(6.0),
                element.y + font + self.px(4.0),
                self.options.font_family,
                font,
                palette::MUTED_TEXT,
                escape_text(label)
            )),
            _ => self.elements.push(format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="middle" dominant-baseline="middle" fill="{}">{}</text>"#,
                element.x + element.width / 2.0,
                element.y + element.height / 2.0,
                self.options.font_family,
                font,
                palette::LABEL_TEXT,
                escape_text(label)
            )),
        }
    }

    fn add_table(&mut self, table: &Table) {
        let (cx, cy) = table.center();
        let colors = palette::table_colors(table.shape);
        let stroke_w = self.px(1.5);

        // Outer scope: body and chairs rotate together about the center
        self.elements.push(format!(
            r#"<g transform="rotate({:.2} {:.2} {:.2})">"#,
            table.rotation, cx, cy
        ));

        match table.shape {
            TableShape::Round => self.elements.push(format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
                cx, cy, table.width / 2.0, colors.fill, colors.stroke, stroke_w
            )),
            TableShape::Rectangular | TableShape::Sweetheart => {
                let rx = if table.shape == TableShape::Sweetheart {
                    table.height.min(table.width) * 0.25
                } else {
                    self.px(6.0)
                };
                self.elements.push(format!(
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
                    table.x, table.y, table.width, table.height, rx,
                    colors.fill, colors.stroke, stroke_w
                ));
            }
        }

        for chair in geometry::chair_positions(table) {
            let fill = if chair.occupied {
                palette::CHAIR_OCCUPIED
            } else {
                palette::CHAIR_EMPTY
            };
            self.elements.push(format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
                chair.x, chair.y, CHAIR_RADIUS, fill, palette::CHAIR_STROKE, self.px(1.0)
            ));
        }

        self.add_status_dot(table);
        self.add_table_label(table, cx, cy);
        self.elements.push("</g>".to_string());
    }

    fn add_status_dot(&mut self, table: &Table) {
        let status = geometry::seat_status(table.occupancy(), table.capacity);
        // Shape-specific fixed offset: on the rim for round, in the corner
        // for the rectangular shapes
        let (dx, dy) = match table.shape {
            TableShape::Round => {
                let r = table.width / 2.0;
                let (cx, cy) = table.center();
                (cx + r * 0.707, cy - r * 0.707)
            }
            TableShape::Rectangular | TableShape::Sweetheart => {
                (table.x + table.width - self.px(6.0), table.y + self.px(6.0))
            }
        };
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.3}"/>"#,
            dx, dy, self.px(5.0), palette::status_color(status), palette::CANVAS_BG, self.px(1.5)
        ));
    }

    fn add_table_label(&mut self, table: &Table, cx: f64, cy: f64) {
        if table.width * self.scale < self.options.min_label_px {
            return;
        }
        let font = self.font_size_for(table.width);
        // Inner scope: the label counter-rotates about the same pivot so the
        // text stays upright whatever the table rotation
        self.elements.push(format!(
            r#"<g transform="rotate({:.2} {:.2} {:.2})">"#,
            -table.rotation, cx, cy
        ));
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="middle" fill="{}">{}</text>"#,
            cx,
            cy - font * 0.25,
            self.options.font_family,
            font,
            palette::LABEL_TEXT,
            escape_text(&table.name)
        ));
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="middle" fill="{}">{}/{}</text>"#,
            cx,
            cy + font * 0.9,
            self.options.font_family,
            font * 0.85,
            palette::MUTED_TEXT,
            table.occupancy(),
            table.capacity
        ));
        self.elements.push("</g>".to_string());
    }

    fn add_legend(&mut self, table_count: usize, element_count: usize) {
        use seatplan_core::geometry::SeatStatus;
        let pad = self.px(12.0);
        let row = self.px(18.0);
        let font = self.px(12.0);
        let entries = [
            SeatStatus::Empty,
            SeatStatus::Partial,
            SeatStatus::Full,
            SeatStatus::OverCapacity,
        ];
        let box_h = row * (entries.len() as f64 + 1.0) + pad * 2.0;
        let box_w = self.px(150.0);
        let x0 = self.origin_x + pad;
        let y0 = self.origin_y + self.height - box_h - pad;

        self.elements.push(format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="{}" fill-opacity="0.92" stroke="{}" stroke-width="{:.3}"/>"#,
            x0, y0, box_w, box_h, self.px(4.0), palette::CANVAS_BG, palette::CHAIR_STROKE, self.px(1.0)
        ));
        for (i, status) in entries.iter().enumerate() {
            let y = y0 + pad + row * (i as f64 + 0.5);
            self.elements.push(format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                x0 + pad,
                y,
                self.px(5.0),
                palette::status_color(*status)
            ));
            self.elements.push(format!(
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" dominant-baseline="middle" fill="{}">{}</text>"#,
                x0 + pad + self.px(14.0),
                y,
                self.options.font_family,
                font,
                palette::LABEL_TEXT,
                status.label()
            ));
        }
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" dominant-baseline="middle" fill="{}">{} tables, {} elements</text>"#,
            x0 + pad,
            y0 + pad + row * (entries.len() as f64 + 0.5),
            self.options.font_family,
            font * 0.9,
            palette::MUTED_TEXT,
            table_count,
            element_count
        ));
    }

    fn finish(self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push('\n');
        out.push_str(&format!(
            r#"<svg width="{:.0}" height="{:.0}" viewBox="{:.2} {:.2} {:.2} {:.2}" xmlns="http://www.w3.org/2000/svg">"#,
            self.out_width, self.out_height, self.origin_x, self.origin_y, self.width, self.height
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
