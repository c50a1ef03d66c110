//! Pagination slicer: partition one tall source raster into page-height
//! chunks. Pure math, no image access; the assembler crops and places the
//! pixel bands this emits.

/// Inputs for one slicing run. The source raster is `src_width x src_height`
/// pixels; each page offers a content area `img_width` wide and
/// `page_content_height` tall in output units. `first_offset` is the output
/// height already consumed on page one (the branded header band).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceParams {
    pub src_width: f64,
    pub src_height: f64,
    pub img_width: f64,
    pub page_content_height: f64,
    pub first_offset: f64,
}

/// One page's worth of content: a source pixel band and its placement
/// rectangle in the page content area. Transient; consumed immediately by
/// the document assembler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub page: usize,
    /// Source band, in source pixels, full source width.
    pub src_y: f64,
    pub src_height: f64,
    /// Placement on the page, in output units from the content-area top.
    pub dest_y: f64,
    pub dest_height: f64,
}

const EPS: f64 = 1e-6;

/// Slice the source raster into pages. The emitted bands tile the source
/// exactly: no gap, no overlap, and the last band closes out `src_height`
/// even when shorter than a full page.
pub fn paginate(params: &SliceParams) -> Vec<PageSlice> {
    let mut slices = Vec::new();
    if params.src_height <= 0.0
        || params.src_width <= 0.0
        || params.img_width <= 0.0
        || params.page_content_height <= 0.0
    {
        return slices;
    }

    let to_output = params.img_width / params.src_width;
    let mut src_y = 0.0;
    let mut page = 0usize;
    let mut y_offset = params.first_offset;

    while src_y < params.src_height - EPS {
        let available = params.page_content_height - y_offset;
        if available <= EPS {
            // Header consumed the whole first page; content starts on the next
            page += 1;
            y_offset = 0.0;
            continue;
        }

        let remaining_output = (params.src_height - src_y) * to_output;
        let (draw_height, draw_src_height) = if remaining_output <= available {
            // Final band: take the exact source remainder so the tiling
            // closes out src_height with no float residue
            (remaining_output, params.src_height - src_y)
        } else {
            (available, available / to_output)
        };

        slices.push(PageSlice {
            page,
            src_y,
            src_height: draw_src_height,
            dest_y: y_offset,
            dest_height: draw_height,
        });

        src_y += draw_src_height;
        if src_y < params.src_height - EPS {
            page += 1;
            y_offset = 0.0;
        }
    }

    slices
}
