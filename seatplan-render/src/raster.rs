//! Capture stage: paint the full export document (floor plan plus forced-open
//! guest roster sections) into one tall RGBA raster. CPU only; the pagination
//! slicer then cuts this raster into page bands.
//!
//! Text is not rasterized. Every label the scene shows (table names,
//! occupancy counts, element labels, legend, roster rows) is emitted as a
//! [`TextSpan`] in raster pixel coordinates; the page assembler overlays the
//! spans as real PDF text on whichever page band they land in.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use seatplan_core::geometry::{self, CHAIR_CLEARANCE, CHAIR_RADIUS};
use seatplan_core::palette::{self, parse_hex_rgb};
use seatplan_core::types::{ElementKind, ElementShape, FloorPlanSnapshot, Table, TableShape};
use seatplan_core::viewport::{self, Viewport};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("render target produced an empty raster")]
    EmptyRaster,
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Raster width in pixels; the plan band height follows the fitted
    /// aspect ratio.
    pub px_width: u32,
    pub plan_border: f64,
    pub section_header_px: u32,
    pub row_px: u32,
    pub section_gap_px: u32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            px_width: 1240,
            plan_border: 24.0,
            section_header_px: 36,
            row_px: 22,
            section_gap_px: 12,
        }
    }
}

/// Tables and elements narrower than this (in raster pixels) get no label.
const MIN_LABEL_PX: f64 = 28.0;
const MIN_FONT_PX: f64 = 10.0;
const MAX_FONT_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

/// One piece of label text, anchored in raster pixel coordinates. `y` is the
/// text baseline.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub x: f64,
    pub y: f64,
    pub size_px: f64,
    pub bold: bool,
    pub anchor: TextAnchor,
    pub color: String,
    pub text: String,
}

/// Capture output: the tall raster plus the label spans to overlay on it.
#[derive(Debug)]
pub struct Capture {
    pub image: RgbaImage,
    pub texts: Vec<TextSpan>,
}

/// One collapsible roster section of the export document, derived from a
/// table. Sections start collapsed, mirroring the on-screen default; the
/// Preparing stage forces them open so no content is silently omitted.
#[derive(Debug, Clone)]
pub struct Section {
    pub table_index: usize,
    pub title: String,
    pub rows: usize,
    pub collapsed: bool,
}

/// The document the capture stage rasterizes: the snapshot plus the section
/// open/closed state.
#[derive(Debug, Clone)]
pub struct ExportDocument<'a> {
    pub snapshot: &'a FloorPlanSnapshot,
    pub sections: Vec<Section>,
}

impl<'a> ExportDocument<'a> {
    pub fn new(snapshot: &'a FloorPlanSnapshot) -> Self {
        let sections = snapshot
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| Section {
                table_index: i,
                title: format!("{} ({}/{})", t.name, t.occupancy(), t.capacity),
                rows: t.guests.len(),
                collapsed: true,
            })
            .collect();
        Self { snapshot, sections }
    }

    /// Force every section open. Collapsed content must not be silently
    /// omitted from the export.
    pub fn expand_all(&mut self) {
        for section in &mut self.sections {
            section.collapsed = false;
        }
    }
}

/// Rasterize the export document. The result is the single tall source image
/// the pagination slicer partitions, plus its label overlay.
pub fn capture(doc: &ExportDocument, options: &CaptureOptions) -> Result<Capture, CaptureError> {
    if options.px_width == 0 {
        return Err(CaptureError::EmptyRaster);
    }
    let snapshot = doc.snapshot;
    let fitted = viewport::fit(
        &snapshot.tables,
        &snapshot.elements,
        CHAIR_CLEARANCE,
        options.plan_border,
        options.px_width as f64,
    );

    let plan_height = match &fitted {
        Some(vp) => vp.output_height.round() as u32,
        None => viewport::MIN_OUTPUT_HEIGHT as u32,
    };
    let sections_height: u32 = doc
        .sections
        .iter()
        .filter(|s| !s.collapsed)
        .map(|s| options.section_header_px + s.rows as u32 * options.row_px + options.section_gap_px)
        .sum();
    let total_height = plan_height + sections_height;
    if total_height == 0 {
        return Err(CaptureError::EmptyRaster);
    }

    let mut img = RgbaImage::from_pixel(options.px_width, total_height, rgba(palette::CANVAS_BG));
    let mut texts = Vec::new();

    match &fitted {
        Some(vp) => draw_plan(&mut img, &mut texts, snapshot, vp),
        None => {
            // Explicit no-data band in place of the plan
            let band = rgba("#f9fafb");
            fill_rect(&mut img, 0, 0, options.px_width, plan_height, band);
            texts.push(TextSpan {
                x: options.px_width as f64 / 2.0,
                y: plan_height as f64 / 2.0,
                size_px: MAX_FONT_PX,
                bold: false,
                anchor: TextAnchor::Middle,
                color: palette::MUTED_TEXT.to_string(),
                text: "No venue data".to_string(),
            });
        }
    }

    draw_sections(&mut img, &mut texts, doc, plan_height, options);
    log::debug!(
        "captured raster {}x{} with {} label spans",
        img.width(),
        img.height(),
        texts.len()
    );
    Ok(Capture { image: img, texts })
}

fn draw_plan(img: &mut RgbaImage, texts: &mut Vec<TextSpan>, snapshot: &FloorPlanSnapshot, vp: &Viewport) {
    let scale = vp.output_width / vp.width;
    let to_px = |x: f64, y: f64| -> (i32, i32) {
        (((x - vp.origin_x) * scale) as i32, ((y - vp.origin_y) * scale) as i32)
    };
    let to_pxf = |x: f64, y: f64| -> (f64, f64) {
        ((x - vp.origin_x) * scale, (y - vp.origin_y) * scale)
    };
    let label_font = |width: f64| (width * scale * 0.14).clamp(MIN_FONT_PX, MAX_FONT_PX);

    // Grid
    let grid = rgba(palette::GRID_LINE);
    let step = 50.0;
    let mut gx = (vp.origin_x / step).ceil() * step;
    while gx <= vp.origin_x + vp.width {
        let (x, _) = to_px(gx, 0.0);
        draw_vline(img, x, 0, vp.output_height as i32, grid);
        gx += step;
    }
    let mut gy = (vp.origin_y / step).ceil() * step;
    while gy <= vp.origin_y + vp.height {
        let (_, y) = to_px(0.0, gy);
        draw_hline(img, 0, vp.output_width as i32, y, grid);
        gy += step;
    }

    for element in &snapshot.elements {
        let fill = rgba(&palette::element_fill(element));
        let stroke = rgba(palette::element_colors(element.kind).stroke);
        let cx = element.x + element.width / 2.0;
        let cy = element.y + element.height / 2.0;
        match element.shape {
            ElementShape::Rect => {
                let corners = rotated_rect_px(
                    element.x, element.y, element.width, element.height,
                    cx, cy, element.rotation, &to_px,
                );
                fill_quad(img, &corners, fill);
                stroke_quad(img, &corners, stroke);
            }
            ElementShape::Circle => {
                let (px, py) = to_px(cx, cy);
                fill_ellipse(
                    img, px, py,
                    element.width / 2.0 * scale,
                    element.height / 2.0 * scale,
                    fill,
                );
            }
        }
        draw_element_decoration(img, element, cx, cy, stroke, &to_px);

        if let Some(label) = &element.label {
            if element.width * scale >= MIN_LABEL_PX {
                let font = label_font(element.width);
                let span = match element.kind {
                    // Area labels hug the top-left so the region reads as a zone
                    ElementKind::Area => {
                        let (px, py) = to_pxf(element.x, element.y);
                        TextSpan {
                            x: px + 6.0,
                            y: py + font + 4.0,
                            size_px: font,
                            bold: false,
                            anchor: TextAnchor::Start,
                            color: palette::MUTED_TEXT.to_string(),
                            text: label.clone(),
                        }
                    }
                    _ => {
                        let (px, py) = to_pxf(cx, cy);
                        TextSpan {
                            x: px,
                            y: py + font * 0.35,
                            size_px: font,
                            bold: false,
                            anchor: TextAnchor::Middle,
                            color: palette::LABEL_TEXT.to_string(),
                            text: label.clone(),
                        }
                    }
                };
                texts.push(span);
            }
        }
    }

    for table in &snapshot.tables {
        draw_table(img, table, scale, &to_px);

        // Labels stay upright whatever the table rotation; the center pivot
        // is rotation-invariant
        if table.width * scale >= MIN_LABEL_PX {
            let (cx, cy) = table.center();
            let (px, py) = to_pxf(cx, cy);
            let font = label_font(table.width);
            texts.push(TextSpan {
                x: px,
                y: py - font * 0.25,
                size_px: font,
                bold: true,
                anchor: TextAnchor::Middle,
                color: palette::LABEL_TEXT.to_string(),
                text: table.name.clone(),
            });
            texts.push(TextSpan {
                x: px,
                y: py + font * 0.9,
                size_px: font * 0.85,
                bold: false,
                anchor: TextAnchor::Middle,
                color: palette::MUTED_TEXT.to_string(),
                text: format!("{}/{}", table.occupancy(), table.capacity),
            });
        }
    }

    draw_legend(img, texts, vp, snapshot.tables.len(), snapshot.elements.len());
}

fn draw_legend(
    img: &mut RgbaImage,
    texts: &mut Vec<TextSpan>,
    vp: &Viewport,
    table_count: usize,
    element_count: usize,
) {
    use seatplan_core::geometry::SeatStatus;
    let entries = [
        SeatStatus::Empty,
        SeatStatus::Partial,
        SeatStatus::Full,
        SeatStatus::OverCapacity,
    ];
    let pad = 12.0;
    let row = 18.0;
    let font = 12.0;
    let box_h = row * (entries.len() as f64 + 1.0) + pad * 2.0;
    let box_w = 150.0;
    let x0 = pad;
    let y0 = vp.output_height - box_h - pad;

    fill_rect(img, x0 as u32, y0 as u32, box_w as u32, box_h as u32, rgba(palette::CANVAS_BG));
    stroke_quad(
        img,
        &[
            (x0 as i32, y0 as i32),
            ((x0 + box_w) as i32, y0 as i32),
            ((x0 + box_w) as i32, (y0 + box_h) as i32),
            (x0 as i32, (y0 + box_h) as i32),
        ],
        rgba(palette::CHAIR_STROKE),
    );
    for (i, status) in entries.iter().enumerate() {
        let y = y0 + pad + row * (i as f64 + 0.5);
        fill_circle(img, (x0 + pad) as i32, y as i32, 5.0, rgba(palette::status_color(*status)));
        texts.push(TextSpan {
            x: x0 + pad + 14.0,
            y: y + font * 0.35,
            size_px: font,
            bold: false,
            anchor: TextAnchor::Start,
            color: palette::LABEL_TEXT.to_string(),
            text: status.label().to_string(),
        });
    }
    texts.push(TextSpan {
        x: x0 + pad,
        y: y0 + pad + row * (entries.len() as f64 + 0.5) + font * 0.35,
        size_px: font * 0.9,
        bold: false,
        anchor: TextAnchor::Start,
        color: palette::MUTED_TEXT.to_string(),
        text: format!("{} tables, {} elements", table_count, element_count),
    });
}

fn draw_element_decoration(
    img: &mut RgbaImage,
    element: &seatplan_core::types::VenueElement,
    cx: f64,
    cy: f64,
    stroke: Rgba<u8>,
    to_px: &impl Fn(f64, f64) -> (i32, i32),
) {
    match element.kind {
        ElementKind::Area => {}
        ElementKind::Lounge => {
            // Sofa outline: inset seat plus a back rail along the top
            let inset = (element.width.min(element.height) * 0.18).max(4.0);
            let seat = rotated_rect_px(
                element.x + inset,
                element.y + inset,
                element.width - 2.0 * inset,
                element.height - 2.0 * inset,
                cx,
                cy,
                element.rotation,
                to_px,
            );
            stroke_quad(img, &seat, stroke);
            let a = rotate_about(element.x + inset, element.y + inset * 1.6, cx, cy, element.rotation);
            let b = rotate_about(
                element.x + element.width - inset,
                element.y + inset * 1.6,
                cx,
                cy,
                element.rotation,
            );
            let (x0, y0) = to_px(a.0, a.1);
            let (x1, y1) = to_px(b.0, b.1);
            draw_line(img, x0, y0, x1, y1, stroke);
        }
        ElementKind::Periquera => {
            let (px, py) = to_px(cx, cy);
            let (rx, _) = to_px(cx + element.width.min(element.height) / 2.0 + 8.0, cy);
            let radius = (rx - px) as f64;
            for i in 0..4 {
                let angle = (-90.0 + i as f64 * 90.0).to_radians();
                fill_circle(
                    img,
                    px + (radius * angle.cos()) as i32,
                    py + (radius * angle.sin()) as i32,
                    3.0,
                    stroke,
                );
            }
        }
        _ => {
            // Front indicator bar
            let a = rotate_about(element.x + element.width * 0.3, element.y + 3.0, cx, cy, element.rotation);
            let b = rotate_about(element.x + element.width * 0.7, element.y + 3.0, cx, cy, element.rotation);
            let (x0, y0) = to_px(a.0, a.1);
            let (x1, y1) = to_px(b.0, b.1);
            draw_line(img, x0, y0, x1, y1, stroke);
        }
    }
}

fn draw_table(
    img: &mut RgbaImage,
    table: &Table,
    scale: f64,
    to_px: &impl Fn(f64, f64) -> (i32, i32),
) {
    let colors = palette::table_colors(table.shape);
    let fill = rgba(colors.fill);
    let stroke = rgba(colors.stroke);
    let (cx, cy) = table.center();

    match table.shape {
        TableShape::Round => {
            let (px, py) = to_px(cx, cy);
            let r = table.width / 2.0 * scale;
            fill_circle(img, px, py, r, fill);
            stroke_circle(img, px, py, r, stroke);
        }
        TableShape::Rectangular | TableShape::Sweetheart => {
            let corners = rotated_rect_px(
                table.x, table.y, table.width, table.height,
                cx, cy, table.rotation, to_px,
            );
            fill_quad(img, &corners, fill);
            stroke_quad(img, &corners, stroke);
        }
    }

    for chair in geometry::chair_positions(table) {
        // Chairs are computed pre-rotation; apply the table rotation here,
        // matching the renderer's group transform
        let (rx, ry) = rotate_about(chair.x, chair.y, cx, cy, table.rotation);
        let (px, py) = to_px(rx, ry);
        let color = if chair.occupied {
            rgba(palette::CHAIR_OCCUPIED)
        } else {
            rgba(palette::CHAIR_EMPTY)
        };
        fill_circle(img, px, py, CHAIR_RADIUS * scale, color);
    }

    let status = geometry::seat_status(table.occupancy(), table.capacity);
    let dot = match table.shape {
        TableShape::Round => {
            let r = table.width / 2.0;
            (cx + r * 0.707, cy - r * 0.707)
        }
        _ => rotate_about(table.x + table.width - 4.0, table.y + 4.0, cx, cy, table.rotation),
    };
    let (px, py) = to_px(dot.0, dot.1);
    fill_circle(img, px, py, 5.0, rgba(palette::status_color(status)));
}

fn draw_sections(
    img: &mut RgbaImage,
    texts: &mut Vec<TextSpan>,
    doc: &ExportDocument,
    plan_height: u32,
    options: &CaptureOptions,
) {
    let width = img.width();
    let header_bg = rgba("#f3f4f6");
    let row_line = rgba("#e5e7eb");
    let mut y = plan_height;
    for section in doc.sections.iter().filter(|s| !s.collapsed) {
        fill_rect(img, 0, y, width, options.section_header_px, header_bg);
        // Left accent bar carries the table's status color
        if let Some(table) = doc.snapshot.tables.get(section.table_index) {
            let status = geometry::seat_status(table.occupancy(), table.capacity);
            fill_rect(img, 0, y, 6, options.section_header_px, rgba(palette::status_color(status)));
        }
        texts.push(TextSpan {
            x: 16.0,
            y: y as f64 + options.section_header_px as f64 * 0.65,
            size_px: 13.0,
            bold: true,
            anchor: TextAnchor::Start,
            color: palette::LABEL_TEXT.to_string(),
            text: section.title.clone(),
        });
        y += options.section_header_px;
        let guests = doc
            .snapshot
            .tables
            .get(section.table_index)
            .map(|t| t.guests.as_slice())
            .unwrap_or(&[]);
        for row in 0..section.rows {
            if let Some(guest) = guests.get(row) {
                texts.push(TextSpan {
                    x: 24.0,
                    y: y as f64 + options.row_px as f64 * 0.7,
                    size_px: 11.0,
                    bold: false,
                    anchor: TextAnchor::Start,
                    color: palette::LABEL_TEXT.to_string(),
                    text: roster_row(guest),
                });
            }
            y += options.row_px;
            draw_hline(img, 12, width as i32 - 12, y as i32 - 1, row_line);
        }
        y += options.section_gap_px;
    }
}

fn roster_row(guest: &seatplan_core::types::SeatedGuest) -> String {
    let mut row = guest.name.clone();
    if let Some(group) = &guest.group {
        row.push_str(&format!(" ({})", group));
    }
    if let Some(dietary) = &guest.dietary {
        row.push_str(&format!(" | {}", dietary));
    }
    if let Some(dish) = &guest.dish {
        row.push_str(&format!(" | {}", dish));
    }
    row
}

// ----- Pixel helpers -----

fn rgba(hex: &str) -> Rgba<u8> {
    let (r, g, b) = parse_hex_rgb(hex).unwrap_or((0, 0, 0));
    Rgba([r, g, b, 255])
}

fn rotate_about(x: f64, y: f64, cx: f64, cy: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    let (dx, dy) = (x - cx, y - cy);
    (
        cx + dx * rad.cos() - dy * rad.sin(),
        cy + dx * rad.sin() + dy * rad.cos(),
    )
}

fn rotated_rect_px(
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    cx: f64,
    cy: f64,
    degrees: f64,
    to_px: &impl Fn(f64, f64) -> (i32, i32),
) -> [(i32, i32); 4] {
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
    let mut out = [(0, 0); 4];
    for (i, (px, py)) in corners.iter().enumerate() {
        let (rx, ry) = rotate_about(*px, *py, cx, cy, degrees);
        out[i] = to_px(rx, ry);
    }
    out
}

fn put(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, color);
        }
    }
}

fn draw_hline(img: &mut RgbaImage, x0: i32, x1: i32, y: i32, color: Rgba<u8>) {
    for x in x0.min(x1)..=x0.max(x1) {
        put(img, x, y, color);
    }
}

fn draw_vline(img: &mut RgbaImage, x: i32, y0: i32, y1: i32, color: Rgba<u8>) {
    for y in y0.min(y1)..=y0.max(y1) {
        put(img, x, y, color);
    }
}

fn draw_line(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    // Bresenham line drawing
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: f64, color: Rgba<u8>) {
    let ri = r.ceil() as i32;
    for dy in -ri..=ri {
        for dx in -ri..=ri {
            if (dx * dx + dy * dy) as f64 <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn stroke_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: f64, color: Rgba<u8>) {
    let steps = ((r * 6.3) as usize).max(16);
    for i in 0..steps {
        let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
        put(
            img,
            cx + (r * angle.cos()).round() as i32,
            cy + (r * angle.sin()).round() as i32,
            color,
        );
    }
}

fn fill_ellipse(img: &mut RgbaImage, cx: i32, cy: i32, rx: f64, ry: f64, color: Rgba<u8>) {
    let (rxi, ryi) = (rx.ceil() as i32, ry.ceil() as i32);
    for dy in -ryi..=ryi {
        for dx in -rxi..=rxi {
            let nx = dx as f64 / rx.max(1e-9);
            let ny = dy as f64 / ry.max(1e-9);
            if nx * nx + ny * ny <= 1.0 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Scanline fill of a convex quad (a rotated rectangle stays convex).
fn fill_quad(img: &mut RgbaImage, corners: &[(i32, i32); 4], color: Rgba<u8>) {
    let y_min = corners.iter().map(|c| c.1).min().unwrap_or(0);
    let y_max = corners.iter().map(|c| c.1).max().unwrap_or(0);
    for y in y_min..=y_max {
        let mut xs: Vec<i32> = Vec::with_capacity(2);
        for i in 0..4 {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % 4];
            if (y0 <= y && y < y1) || (y1 <= y && y < y0) {
                let t = (y - y0) as f64 / (y1 - y0) as f64;
                xs.push(x0 + (t * (x1 - x0) as f64).round() as i32);
            }
        }
        xs.sort_unstable();
        if xs.len() >= 2 {
            for x in xs[0]..=xs[xs.len() - 1] {
                put(img, x, y, color);
            }
        }
    }
}

fn stroke_quad(img: &mut RgbaImage, corners: &[(i32, i32); 4], color: Rgba<u8>) {
    for i in 0..4 {
        let (x0, y0) = corners[i];
        let (x1, y1) = corners[(i + 1) % 4];
        draw_line(img, x0, y0, x1, y1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::types::{EventInfo, PlanStats};

    fn snapshot(tables: Vec<Table>) -> FloorPlanSnapshot {
        FloorPlanSnapshot {
            event: EventInfo { couple: "A & B".into(), date: None, slug: "a-b".into() },
            tables,
            elements: Vec::new(),
            stats: PlanStats::default(),
        }
    }

    fn round_table(guests: usize) -> Table {
        Table {
            number: 1,
            name: "T1".into(),
            shape: TableShape::Round,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            capacity: 8,
            guests: (0..guests)
                .map(|i| seatplan_core::types::SeatedGuest {
                    name: format!("g{}", i),
                    group: None,
                    status: seatplan_core::types::GuestStatus::Confirmed,
                    dietary: None,
                    dish: None,
                    seat: None,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_plan_still_captures_a_no_data_band() {
        let snap = snapshot(Vec::new());
        let doc = ExportDocument::new(&snap);
        let cap = capture(&doc, &CaptureOptions::default()).unwrap();
        assert_eq!(cap.image.width(), 1240);
        assert_eq!(cap.image.height(), viewport::MIN_OUTPUT_HEIGHT as u32);
        assert!(cap.texts.iter().any(|t| t.text == "No venue data"));
    }

    #[test]
    fn expanded_sections_grow_the_raster() {
        let snap = snapshot(vec![round_table(6)]);
        let mut doc = ExportDocument::new(&snap);
        let opts = CaptureOptions::default();
        let collapsed = capture(&doc, &opts).unwrap();
        doc.expand_all();
        let expanded = capture(&doc, &opts).unwrap();
        let expected = opts.section_header_px + 6 * opts.row_px + opts.section_gap_px;
        assert_eq!(expanded.image.height(), collapsed.image.height() + expected);
    }

    #[test]
    fn zero_width_capture_is_an_error() {
        let snap = snapshot(Vec::new());
        let doc = ExportDocument::new(&snap);
        let opts = CaptureOptions { px_width: 0, ..Default::default() };
        assert!(matches!(capture(&doc, &opts), Err(CaptureError::EmptyRaster)));
    }

    #[test]
    fn plan_band_contains_table_fill_pixels() {
        let snap = snapshot(vec![round_table(0)]);
        let doc = ExportDocument::new(&snap);
        let cap = capture(&doc, &CaptureOptions::default()).unwrap();
        let fill = rgba(palette::table_colors(TableShape::Round).fill);
        let found = cap.image.pixels().any(|p| *p == fill);
        assert!(found, "expected round-table fill color in the raster");
    }

    #[test]
    fn labels_survive_the_capture_as_text_spans() {
        let snap = snapshot(vec![round_table(3)]);
        let mut doc = ExportDocument::new(&snap);
        doc.expand_all();
        let cap = capture(&doc, &CaptureOptions::default()).unwrap();
        let texts: Vec<&str> = cap.texts.iter().map(|t| t.text.as_str()).collect();
        // Table label pair, legend, section title, roster row
        assert!(texts.contains(&"T1"));
        assert!(texts.contains(&"3/8"));
        assert!(texts.contains(&"Empty"));
        assert!(texts.contains(&"1 tables, 0 elements"));
        assert!(texts.contains(&"T1 (3/8)"));
        assert!(texts.contains(&"g0"));
        let name = cap.texts.iter().find(|t| t.text == "T1").unwrap();
        assert!(name.bold);
        assert_eq!(name.anchor, TextAnchor::Middle);
    }

    #[test]
    fn lounge_decoration_reaches_the_raster() {
        let element = seatplan_core::types::VenueElement {
            kind: ElementKind::Lounge,
            shape: ElementShape::Rect,
            label: None,
            x: 20.0,
            y: 20.0,
            width: 100.0,
            height: 60.0,
            rotation: 0.0,
            color: None,
        };
        let mut img = RgbaImage::from_pixel(200, 120, rgba(palette::CANVAS_BG));
        let stroke = rgba(palette::element_colors(ElementKind::Lounge).stroke);
        let to_px = |x: f64, y: f64| (x as i32, y as i32);
        draw_element_decoration(&mut img, &element, 70.0, 50.0, stroke, &to_px);
        let count = img.pixels().filter(|p| **p == stroke).count();
        assert!(count > 0, "expected sofa outline pixels for the lounge");
    }
}
