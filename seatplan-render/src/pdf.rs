//! Page assembler: builds the paginated A4 document from raster bands, with
//! a branded first-page header and a footer band on every page.

use image::{DynamicImage, RgbaImage};
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon,
    PolygonMode, Rgb,
};
use thiserror::Error;

use seatplan_core::paginate::PageSlice;
use seatplan_core::palette::parse_hex_rgb;

use crate::raster::{TextAnchor, TextSpan};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 10.0;
/// Branded header band on the first page, full width, fixed height.
pub const HEADER_BAND_MM: f64 = 34.0;
/// Thin footer band on every page.
pub const FOOTER_BAND_MM: f64 = 12.0;

/// Width budget for page content images.
pub const IMG_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
/// Height budget for page content, between top margin and footer band.
pub const PAGE_CONTENT_HEIGHT_MM: f64 = PAGE_HEIGHT_MM - MARGIN_MM - FOOTER_BAND_MM - 4.0;
/// Content consumed by the header band on page one, in content-area units.
pub const FIRST_PAGE_OFFSET_MM: f64 = HEADER_BAND_MM + 6.0 - MARGIN_MM;

const BRAND_COLOR: &str = "#be185d";
const EMBED_DPI: f64 = 150.0;
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Page geometry is tracked in f64; printpdf lengths are f32.
fn mm(v: f64) -> Mm {
    Mm(v as f32)
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("pdf backend error: {0}")]
    Backend(String),
    #[error("raster band out of range on page {0}")]
    BadBand(usize),
}

/// Static text of the assembled document.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    pub subtitle: String,
    pub site: String,
}

/// PDF builder wrapping printpdf. One instance assembles one document.
pub struct PdfBuilder {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
}

impl PdfBuilder {
    pub fn new(title: &str) -> Result<Self, PdfError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Backend(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfError::Backend(e.to_string()))?;
        Ok(Self { doc, font, font_bold, pages: vec![(page, layer)] })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Place every raster band on its page, overlay the label spans onto the
    /// page each band lands on, then draw the header, footers, and page
    /// numbers.
    pub fn assemble(
        &mut self,
        raster: &RgbaImage,
        slices: &[PageSlice],
        texts: &[TextSpan],
        meta: &DocumentMeta,
    ) -> Result<(), PdfError> {
        for slice in slices {
            while self.pages.len() <= slice.page {
                let (page, layer) = self.doc.add_page(
                    mm(PAGE_WIDTH_MM),
                    mm(PAGE_HEIGHT_MM),
                    format!("Layer {}", self.pages.len() + 1),
                );
                self.pages.push((page, layer));
            }
            self.place_band(raster, slice)?;
        }

        self.overlay_texts(raster.width() as f64, slices, texts);
        self.draw_header(meta);
        let total = self.pages.len();
        for page in 0..total {
            self.draw_footer(page, total, meta);
        }
        Ok(())
    }

    /// The capture stage does not rasterize text; every label arrives here as
    /// a span in raster pixel coordinates and is drawn as real PDF text on
    /// the page whose band contains its baseline.
    fn overlay_texts(&self, raster_width: f64, slices: &[PageSlice], texts: &[TextSpan]) {
        let to_output = IMG_WIDTH_MM / raster_width;
        for span in texts {
            let Some(slice) = slices
                .iter()
                .find(|s| span.y >= s.src_y && span.y < s.src_y + s.src_height)
            else {
                continue;
            };
            let size_mm = span.size_px * to_output;
            let mut x_mm = MARGIN_MM + span.x * to_output;
            if span.anchor == TextAnchor::Middle {
                // Center on an average advance of half an em per character
                x_mm -= 0.25 * size_mm * span.text.chars().count() as f64;
            }
            let y_in_page = slice.dest_y + (span.y - slice.src_y) * to_output;
            let layer = self.layer(slice.page);
            layer.set_fill_color(hex_color(&span.color));
            let font = if span.bold { &self.font_bold } else { &self.font };
            layer.use_text(
                span.text.as_str(),
                (size_mm * PT_PER_MM) as f32,
                mm(x_mm),
                mm(PAGE_HEIGHT_MM - MARGIN_MM - y_in_page),
                font,
            );
        }
    }

    fn place_band(&self, raster: &RgbaImage, slice: &PageSlice) -> Result<(), PdfError> {
        let y0 = slice.src_y.round().max(0.0) as u32;
        let band_h = slice.src_height.round().max(1.0) as u32;
        if y0 >= raster.height() {
            return Err(PdfError::BadBand(slice.page));
        }
        let band_h = band_h.min(raster.height() - y0);
        let band = image::imageops::crop_imm(raster, 0, y0, raster.width(), band_h).to_image();
        // printpdf has no alpha channel support; the capture is opaque anyway
        let band = DynamicImage::ImageRgba8(band).to_rgb8();
        let (w_px, h_px) = (band.width() as f64, band.height() as f64);

        let natural_w_mm = w_px * 25.4 / EMBED_DPI;
        let natural_h_mm = h_px * 25.4 / EMBED_DPI;
        let translate_y =
            PAGE_HEIGHT_MM - MARGIN_MM - slice.dest_y - slice.dest_height;

        let img = printpdf::Image::from_dynamic_image(&DynamicImage::ImageRgb8(band));
        img.add_to_layer(
            self.layer(slice.page),
            ImageTransform {
                translate_x: Some(mm(MARGIN_MM)),
                translate_y: Some(mm(translate_y)),
                scale_x: Some((IMG_WIDTH_MM / natural_w_mm) as f32),
                scale_y: Some((slice.dest_height / natural_h_mm) as f32),
                dpi: Some(EMBED_DPI as f32),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn draw_header(&self, meta: &DocumentMeta) {
        let layer = self.layer(0);
        layer.set_fill_color(hex_color(BRAND_COLOR));
        layer.add_polygon(filled_rect(
            0.0,
            PAGE_HEIGHT_MM - HEADER_BAND_MM,
            PAGE_WIDTH_MM,
            HEADER_BAND_MM,
        ));
        layer.set_fill_color(gray(1.0));
        layer.use_text(
            meta.title.as_str(),
            20.0,
            mm(MARGIN_MM),
            mm(PAGE_HEIGHT_MM - 14.0),
            &self.font_bold,
        );
        layer.use_text(
            meta.subtitle.as_str(),
            11.0,
            mm(MARGIN_MM),
            mm(PAGE_HEIGHT_MM - 23.0),
            &self.font,
        );
    }

    fn draw_footer(&self, page: usize, total: usize, meta: &DocumentMeta) {
        let layer = self.layer(page);
        layer.set_fill_color(hex_color("#f3f4f6"));
        layer.add_polygon(filled_rect(0.0, 0.0, PAGE_WIDTH_MM, FOOTER_BAND_MM));
        layer.set_fill_color(gray(0.42));
        let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
        layer.use_text(
            format!("{} | {}", meta.site, stamp),
            8.0,
            mm(MARGIN_MM),
            mm(4.5),
            &self.font,
        );
        layer.use_text(
            format!("Page {} of {}", page + 1, total),
            8.0,
            mm(PAGE_WIDTH_MM - MARGIN_MM - 22.0),
            mm(4.5),
            &self.font,
        );
    }

    /// Serialize the document. In-memory so a failed export never leaves a
    /// partially written file behind.
    pub fn save_to_bytes(self) -> Result<Vec<u8>, PdfError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| PdfError::Backend(e.to_string()))
    }

    fn layer(&self, page: usize) -> PdfLayerReference {
        let (page_idx, layer_idx) = self.pages[page];
        self.doc.get_page(page_idx).get_layer(layer_idx)
    }
}

fn filled_rect(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    Polygon {
        rings: vec![vec![
            (Point::new(mm(x), mm(y)), false),
            (Point::new(mm(x + w), mm(y)), false),
            (Point::new(mm(x + w), mm(y + h)), false),
            (Point::new(mm(x), mm(y + h)), false),
        ]],
        mode: PolygonMode::Fill,
        ..Default::default()
    }
}

fn hex_color(hex: &str) -> Color {
    let (r, g, b) = parse_hex_rgb(hex).unwrap_or((0, 0, 0));
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn gray(v: f32) -> Color {
    Color::Rgb(Rgb::new(v, v, v, None))
}
