//! Page layout of an evaluated net and its SVG serialization.
//!
//! The segments are written untransformed; each layer group carries one
//! `matrix(...)` that rotates the net about its centre and drops it onto the
//! page. Labels and logo are placed in page coordinates.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DielineError, Result};
use crate::evaluate::Segment;
use crate::geom::{Affine, Bounds, Point};
use crate::gross::gross_dimensions;
use crate::lang::Language;
use crate::logo::Logo;
use crate::params::BoxParameters;
use crate::svg::{fmt_matrix, fmt_mm, svg_escape};
use crate::table::SegmentKind;

pub const LABEL_FONT_MM: f64 = 4.0;
pub const LABEL_PITCH_MM: f64 = 6.0;
pub const LABEL_LINES: usize = 3;
pub const STROKE_MM: f64 = 0.25;
/// Margin around the net, as a fraction of the box height.
pub const MARGIN_FACTOR: f64 = 0.5;
/// Logo height, as a fraction of the box height.
pub const LOGO_FACTOR: f64 = 0.5;

const CUT_COLOR: &str = "#ff0000";
const FOLD_COLOR: &str = "#0000ff";
const FOLD_DASH: &str = "2,2";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Net turned a quarter clockwise.
    #[default]
    Portrait,
    /// Net as constructed.
    Landscape,
}

impl Orientation {
    pub fn rotation_deg(self) -> f64 {
        match self {
            Orientation::Portrait => 90.0,
            Orientation::Landscape => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub label: bool,
    pub logo: Option<PathBuf>,
    pub language: Language,
    /// Minimum canvas; the canvas grows to fit the net.
    pub page: PageSize,
    pub orientation: Orientation,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            label: true,
            logo: None,
            language: Language::En,
            page: PageSize::A4,
            orientation: Orientation::Portrait,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogoPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub data_uri: String,
}

/// A laid-out net. All lengths in millimetres, page origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    pub width_mm: f64,
    pub height_mm: f64,
    pub title: String,
    /// Net coordinates to page coordinates.
    pub transform: Affine,
    pub cut: Vec<Segment>,
    pub fold: Vec<Segment>,
    pub labels: Vec<LabelLine>,
    pub logo: Option<LogoPlacement>,
}

/// Place `segments` on a page. Fails only when there is nothing to place.
pub fn layout(
    segments: &[Segment],
    params: &BoxParameters,
    options: &RenderOptions,
) -> Result<Drawing> {
    let raw = Bounds::of_points(segments.iter().flat_map(|s| [s.start(), s.end()]))
        .filter(Bounds::is_finite)
        .ok_or(DielineError::DegenerateGeometry)?;
    let center = raw.center();
    let turn = Affine::translate(-center.x, -center.y)
        .then(&Affine::rotate(options.orientation.rotation_deg()));
    let turned = Bounds::of_points(corners(&raw).map(|p| turn.apply(p)))
        .ok_or(DielineError::DegenerateGeometry)?;

    let margin = MARGIN_FACTOR * params.h;
    let label_block = if options.label {
        LABEL_LINES as f64 * LABEL_PITCH_MM
    } else {
        0.0
    };
    let logo = options.logo.as_deref().and_then(Logo::load);
    // the logo gets its own band above the labels, so it never covers a line
    let logo_band = if logo.is_some() {
        LOGO_FACTOR * params.h
    } else {
        0.0
    };
    let top_block = label_block + logo_band;
    let width_mm = options.page.width_mm.max(turned.width() + 2.0 * margin);
    let height_mm = options
        .page
        .height_mm
        .max(turned.height() + 2.0 * margin + top_block);

    // centred in the area below the top block
    let cx = width_mm / 2.0;
    let cy = (height_mm + top_block) / 2.0;
    let transform = turn.then(&Affine::translate(cx - turned.center().x, cy - turned.center().y));
    let net_top = cy - turned.height() / 2.0;

    let texts = options.language.texts();
    let mut labels = Vec::new();
    if options.label {
        let g = gross_dimensions(params);
        let lines = [
            format!(
                "{}: {} x {} x {} mm (R {}, ep {})",
                texts.net_label,
                fmt_mm(params.l),
                fmt_mm(params.b),
                fmt_mm(params.h),
                fmt_mm(params.r),
                fmt_mm(params.ep)
            ),
            format!(
                "{}: {} x {} x {} mm",
                texts.gross_label,
                fmt_mm(g.l),
                fmt_mm(g.b),
                fmt_mm(g.h)
            ),
            texts.footer.to_string(),
        ];
        for (i, text) in lines.into_iter().enumerate() {
            let from_bottom = (LABEL_LINES - 1 - i) as f64;
            labels.push(LabelLine {
                text,
                x: cx,
                y: net_top - from_bottom * LABEL_PITCH_MM - LABEL_PITCH_MM / 2.0,
            });
        }
    }

    let logo = logo.map(|logo| {
        let width = logo_band * logo.aspect();
        LogoPlacement {
            x: width_mm - margin / 2.0 - width,
            y: margin / 2.0,
            width,
            height: logo_band,
            data_uri: logo.data_uri,
        }
    });

    let (cut, fold): (Vec<Segment>, Vec<Segment>) =
        segments.iter().copied().partition(|s| s.kind == SegmentKind::Cut);
    tracing::debug!(
        width_mm,
        height_mm,
        cut = cut.len(),
        fold = fold.len(),
        logo = logo.is_some(),
        "laid out box net"
    );
    Ok(Drawing {
        width_mm,
        height_mm,
        title: format!(
            "{} {}x{}x{} ep{}",
            texts.box_title,
            fmt_mm(params.l),
            fmt_mm(params.b),
            fmt_mm(params.h),
            fmt_mm(params.ep)
        ),
        transform,
        cut,
        fold,
        labels,
        logo,
    })
}

fn corners(b: &Bounds) -> [Point; 4] {
    [
        Point { x: b.min_x, y: b.min_y },
        Point { x: b.max_x, y: b.min_y },
        Point { x: b.max_x, y: b.max_y },
        Point { x: b.min_x, y: b.max_y },
    ]
}

impl Drawing {
    /// Bounding box of the net on the page.
    pub fn placed_bounds(&self) -> Option<Bounds> {
        Bounds::of_points(
            self.cut
                .iter()
                .chain(&self.fold)
                .flat_map(|s| [s.start(), s.end()])
                .map(|p| self.transform.apply(p)),
        )
    }

    /// The drawing as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Drawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">",
            w = fmt_mm(self.width_mm),
            h = fmt_mm(self.height_mm)
        )?;
        writeln!(f, "<title>{}</title>", svg_escape(&self.title))?;
        let matrix = fmt_matrix(&self.transform);
        for (kind, segs) in [(SegmentKind::Cut, &self.cut), (SegmentKind::Fold, &self.fold)] {
            let (color, dash) = match kind {
                SegmentKind::Cut => (CUT_COLOR, String::new()),
                SegmentKind::Fold => (FOLD_COLOR, format!(" stroke-dasharray=\"{FOLD_DASH}\"")),
            };
            writeln!(
                f,
                "<g id=\"{}\" transform=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"{}>",
                kind.layer_id(),
                matrix,
                color,
                fmt_mm(STROKE_MM),
                dash
            )?;
            for seg in segs {
                writeln!(
                    f,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                    fmt_mm(seg.x0),
                    fmt_mm(seg.y0),
                    fmt_mm(seg.x1),
                    fmt_mm(seg.y1)
                )?;
            }
            writeln!(f, "</g>")?;
        }
        if !self.labels.is_empty() {
            writeln!(
                f,
                "<g id=\"LABEL\" font-family=\"sans-serif\" font-size=\"{}\" text-anchor=\"middle\" fill=\"#000000\">",
                fmt_mm(LABEL_FONT_MM)
            )?;
            for l in &self.labels {
                writeln!(
                    f,
                    "<text x=\"{}\" y=\"{}\">{}</text>",
                    fmt_mm(l.x),
                    fmt_mm(l.y),
                    svg_escape(&l.text)
                )?;
            }
            writeln!(f, "</g>")?;
        }
        if let Some(logo) = &self.logo {
            writeln!(
                f,
                "<image id=\"LOGO\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" xlink:href=\"{}\"/>",
                fmt_mm(logo.x),
                fmt_mm(logo.y),
                fmt_mm(logo.width),
                fmt_mm(logo.height),
                logo.data_uri
            )?;
        }
        writeln!(f, "</svg>")
    }
}
