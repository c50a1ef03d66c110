/*!
# Seatplan Rendering Pipeline

Turns a floor-plan snapshot into an on-screen SVG scene and, on export, a
paginated branded PDF.

## Architecture

- `svg` renders the vector scene: grid, venue elements with per-kind
  decorations, tables with chairs and counter-rotated labels, legend.
- `raster` is the capture stage: it paints the full export document (plan
  plus forced-open guest roster sections) into one tall RGBA raster and
  collects every label as a text span in raster coordinates.
- `pdf` assembles A4 pages from raster bands, overlays the label spans as
  real PDF text, and adds a first-page header band and a per-page footer
  band.
- `export` drives the staged pipeline with a re-entrancy guard and
  monotonic progress reporting.
*/

pub mod svg;
pub mod raster;
pub mod pdf;
pub mod export;

pub use svg::{FloorPlanRenderer, RenderOptions};
pub use raster::{capture, Capture, CaptureError, CaptureOptions, ExportDocument, TextSpan};
pub use pdf::{PdfBuilder, PdfError, IMG_WIDTH_MM, PAGE_CONTENT_HEIGHT_MM};
pub use export::{ExportError, ExportOrchestrator, ExportOutcome, ExportReport, ExportStage};
