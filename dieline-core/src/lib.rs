//! Dielines for rigid set-up boxes.
//!
//! Five measurements go in (`L`, `B`, `H`, `R`, board thickness `ep`); a
//! page-sized drawing of every cut and fold line of the lid and base comes
//! out, as SVG text ready for PDF conversion.
//!
//! ```text
//! BoxParameters -> DerivedQuantities -> Vec<Segment> -> Drawing -> SVG
//!                   (derive)            (evaluate)      (render)
//! ```

pub mod derive;
pub mod error;
pub mod evaluate;
pub mod expr;
pub mod geom;
pub mod gross;
pub mod lang;
pub mod logo;
pub mod params;
pub mod raster;
pub mod render;
pub mod svg;
pub mod table;
pub mod template;

pub use derive::{DerivedQuantities, Symbol};
pub use error::{DielineError, Result, TableError};
pub use evaluate::{Segment, evaluate_segments};
pub use gross::{GrossDimensions, gross_dimensions};
pub use lang::Language;
pub use params::{BoxParameters, BoxRequest};
pub use render::{Drawing, Orientation, PageSize, RenderOptions, layout};
pub use table::{SegmentKind, SegmentTable};
pub use template::{CardTemplate, card_template_svg};

use crate::svg::fmt_mm;

/// Full pipeline against a given table.
pub fn render_box(
    params: &BoxParameters,
    options: &RenderOptions,
    table: &SegmentTable,
) -> Result<Drawing> {
    let q = DerivedQuantities::from_params(params);
    let segments = evaluate_segments(table, &q);
    layout(&segments, params, options)
}

/// SVG of the built-in box for `params`.
pub fn generate_box_svg(params: &BoxParameters, options: &RenderOptions) -> Result<String> {
    let table = SegmentTable::builtin()?;
    Ok(render_box(params, options, table)?.to_svg())
}

/// `box_{L}x{B}x{H}_ep{ep}.pdf`
pub fn download_filename(params: &BoxParameters) -> String {
    format!(
        "box_{}x{}x{}_ep{}.pdf",
        fmt_mm(params.l),
        fmt_mm(params.b),
        fmt_mm(params.h),
        fmt_mm(params.ep)
    )
}
