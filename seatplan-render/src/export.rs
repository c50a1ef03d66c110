//! Export orchestration: the staged pipeline from snapshot to saved PDF.
//!
//! An explicit state machine drives the stages; every failure is recovered
//! here and surfaced as one generic error, with the cause logged. The
//! re-entrancy guard is released on every path, so a failed export never
//! blocks the next attempt.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use seatplan_core::paginate::{paginate, SliceParams};
use seatplan_core::types::FloorPlanSnapshot;

use crate::pdf::{
    DocumentMeta, PdfBuilder, PdfError, FIRST_PAGE_OFFSET_MM, IMG_WIDTH_MM,
    PAGE_CONTENT_HEIGHT_MM,
};
use crate::raster::{capture, CaptureError, CaptureOptions, ExportDocument};

/// Pipeline stages, in order. Any stage failure transitions back to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Preparing,
    Capturing,
    Measuring,
    Paginating,
    Assembling,
    Saving,
}

impl ExportStage {
    /// Coarse progress percentage reported when the stage begins.
    fn progress(self) -> u8 {
        match self {
            ExportStage::Idle => 0,
            ExportStage::Preparing => 10,
            ExportStage::Capturing => 30,
            ExportStage::Measuring => 50,
            ExportStage::Paginating => 65,
            ExportStage::Assembling => 85,
            ExportStage::Saving => 95,
        }
    }
}

/// The single user-visible failure. Per-stage causes are logged, not
/// propagated; the user may retry immediately.
#[derive(Debug, Error)]
#[error("floor plan export failed")]
pub struct ExportError;

#[derive(Debug)]
pub enum ExportOutcome {
    Completed(ExportReport),
    /// An export was already in flight; the request was a no-op.
    AlreadyRunning,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub pages: usize,
    pub raster_width: u32,
    pub raster_height: u32,
}

#[derive(Debug, Error)]
enum StageError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("save failed: {0}")]
    Save(#[from] std::io::Error),
}

pub struct ExportOrchestrator {
    capture_options: CaptureOptions,
    in_flight: AtomicBool,
}

impl Default for ExportOrchestrator {
    fn default() -> Self {
        Self::new(CaptureOptions::default())
    }
}

/// Guard releasing the in-flight flag on drop, whichever stage failed.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportOrchestrator {
    pub fn new(capture_options: CaptureOptions) -> Self {
        Self { capture_options, in_flight: AtomicBool::new(false) }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the export pipeline. A second request while one is in flight is a
    /// no-op. The snapshot is treated as an immutable view for the whole run.
    pub fn export(
        &self,
        snapshot: &FloorPlanSnapshot,
        out_dir: &Path,
        mut progress: Option<&mut dyn FnMut(ExportStage, u8)>,
    ) -> Result<ExportOutcome, ExportError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("export request ignored: one already in flight");
            return Ok(ExportOutcome::AlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut report = |stage: ExportStage| {
            if let Some(cb) = progress.as_deref_mut() {
                cb(stage, stage.progress());
            }
        };

        match self.run(snapshot, out_dir, &mut report) {
            Ok(r) => {
                if let Some(cb) = progress.as_deref_mut() {
                    cb(ExportStage::Idle, 100);
                }
                Ok(ExportOutcome::Completed(r))
            }
            Err(e) => {
                log::error!("floor plan export failed: {}", e);
                Err(ExportError)
            }
        }
    }

    fn run(
        &self,
        snapshot: &FloorPlanSnapshot,
        out_dir: &Path,
        report: &mut dyn FnMut(ExportStage),
    ) -> Result<ExportReport, StageError> {
        // Preparing: force every collapsible section open and re-render the
        // document so nothing hidden is omitted from the capture
        report(ExportStage::Preparing);
        if let Err(e) = snapshot.validate() {
            log::warn!("exporting snapshot with validation issue: {}", e);
        }
        let mut doc = ExportDocument::new(snapshot);
        doc.expand_all();

        // Capturing: rasterize the expanded document
        report(ExportStage::Capturing);
        let cap = capture(&doc, &self.capture_options)?;
        let raster = &cap.image;

        // Measuring: a raster that decodes to zero dimensions is a capture
        // failure, same propagation path
        report(ExportStage::Measuring);
        if raster.width() == 0 || raster.height() == 0 {
            return Err(CaptureError::EmptyRaster.into());
        }

        report(ExportStage::Paginating);
        let slices = paginate(&SliceParams {
            src_width: raster.width() as f64,
            src_height: raster.height() as f64,
            img_width: IMG_WIDTH_MM,
            page_content_height: PAGE_CONTENT_HEIGHT_MM,
            first_offset: FIRST_PAGE_OFFSET_MM,
        });

        report(ExportStage::Assembling);
        let meta = DocumentMeta {
            title: "Venue Floor Plan".to_string(),
            subtitle: match &snapshot.event.date {
                Some(date) => format!("{} | {}", snapshot.event.couple, date),
                None => snapshot.event.couple.clone(),
            },
            site: "seatplan.app".to_string(),
        };
        let mut builder = PdfBuilder::new(&meta.title)?;
        builder.assemble(raster, &slices, &cap.texts, &meta)?;
        let pages = builder.page_count();
        // Serialize before touching the filesystem; a failure here retains
        // no partial file
        let bytes = builder.save_to_bytes()?;

        report(ExportStage::Saving);
        let path = out_dir.join(format!("floor-plan-{}.pdf", snapshot.event.slug));
        std::fs::write(&path, &bytes)?;
        log::info!("exported {} pages to {}", pages, path.display());

        Ok(ExportReport {
            path,
            pages,
            raster_width: raster.width(),
            raster_height: raster.height(),
        })
    }
}
