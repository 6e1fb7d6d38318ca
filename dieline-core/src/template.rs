//! Print template for a flat card: bleed, unsafe ring and safe area, with a
//! legend and the pixel sizes a designer needs at 300 DPI.

use std::fmt;

use crate::error::{DielineError, Result};
use crate::lang::Language;
use crate::logo::Logo;
use crate::svg::{fmt_mm, svg_escape};

pub const BLEED_MM: f64 = 3.0;
pub const SAFE_MARGIN_MM: f64 = 4.0;
pub const CORNER_RADIUS_MM: f64 = 5.0;
pub const HATCH_PITCH_MM: f64 = 2.0;
pub const PRINT_DPI: f64 = 300.0;

const MM_PER_INCH: f64 = 25.4;
const MM_PER_PT: f64 = MM_PER_INCH / 72.0;

#[derive(Clone, Debug, PartialEq)]
pub struct CardTemplate {
    pub svg: String,
    /// Suggested download name, `template_{w}x{h}mm_{LANG}.pdf`.
    pub filename: String,
    pub title: String,
    /// Page size, cut size plus bleed on every side.
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Font sizes in points for the legend, headers and data lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSizes {
    pub desc: f64,
    pub header: f64,
    pub data: f64,
}

impl TextSizes {
    /// Base 7/8/8 pt; cards with a side under 100 mm shrink the text, under
    /// 60 mm harder, never below the floors.
    pub fn for_card(width_mm: f64, height_mm: f64) -> TextSizes {
        let (desc, header, data) = (7.0_f64, 8.0_f64, 8.0_f64);
        let min_dim = width_mm.min(height_mm);
        if min_dim >= 100.0 {
            return TextSizes { desc, header, data };
        }
        let scale = min_dim / 100.0;
        if min_dim < 60.0 {
            let s = scale * 0.8;
            TextSizes {
                desc: (desc * s).max(3.5),
                header: (header * s).max(4.0),
                data: (data * s).max(4.0),
            }
        } else {
            TextSizes {
                desc: (desc * scale).max(4.5),
                header: (header * scale).max(5.0),
                data: (data * scale).max(5.0),
            }
        }
    }
}

fn check_size(field: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(DielineError::invalid(field, "card size must be a positive number"));
    }
    if v <= 2.0 * SAFE_MARGIN_MM {
        return Err(DielineError::invalid(
            field,
            format!("card is too small for the {SAFE_MARGIN_MM} mm safe margin"),
        ));
    }
    Ok(())
}

/// Closed rounded rectangle as path data, corner radius clamped to fit.
fn rounded_rect(x: f64, y: f64, w: f64, h: f64, r: f64) -> String {
    let r = r.min(w / 2.0).min(h / 2.0);
    format!(
        "M{} {} H{} A{r} {r} 0 0 1 {} {} V{} A{r} {r} 0 0 1 {} {} H{} A{r} {r} 0 0 1 {} {} V{} A{r} {r} 0 0 1 {} {} Z",
        fmt_mm(x + r),
        fmt_mm(y),
        fmt_mm(x + w - r),
        fmt_mm(x + w),
        fmt_mm(y + r),
        fmt_mm(y + h - r),
        fmt_mm(x + w - r),
        fmt_mm(y + h),
        fmt_mm(x + r),
        fmt_mm(x),
        fmt_mm(y + h - r),
        fmt_mm(y + r),
        fmt_mm(x + r),
        fmt_mm(y),
        r = fmt_mm(r)
    )
}

pub fn card_template_svg(
    width_mm: f64,
    height_mm: f64,
    lang: Language,
    logo: Option<&Logo>,
) -> Result<CardTemplate> {
    check_size("width", width_mm)?;
    check_size("height", height_mm)?;
    let txt = lang.texts();

    let page_w = width_mm + 2.0 * BLEED_MM;
    let page_h = height_mm + 2.0 * BLEED_MM;
    let safe_x = BLEED_MM + SAFE_MARGIN_MM;
    let safe_y = safe_x;
    let safe_w = width_mm - 2.0 * SAFE_MARGIN_MM;
    let safe_h = height_mm - 2.0 * SAFE_MARGIN_MM;
    let cut_path = rounded_rect(BLEED_MM, BLEED_MM, width_mm, height_mm, CORNER_RADIUS_MM);
    let safe_path = rounded_rect(safe_x, safe_y, safe_w, safe_h, CORNER_RADIUS_MM);

    let title = format!(
        "{} {}x{} {}",
        txt.card_title,
        fmt_mm(width_mm),
        fmt_mm(height_mm),
        lang.code()
    );
    let filename = format!(
        "template_{}x{}mm_{}.pdf",
        fmt_mm(width_mm),
        fmt_mm(height_mm),
        lang.code()
    );

    // logo, or a crossed frame where it would go
    let scale = if width_mm < 60.0 { width_mm / 60.0 } else { 1.0 };
    let (logo_w, logo_h) = match logo {
        Some(l) => {
            let w = (30.0_f64).min(safe_w * 0.5) * scale;
            (w, w / l.aspect())
        }
        None => (30.0 * scale, 10.0 * scale),
    };
    let logo_box = Rect {
        x: safe_x + (safe_w - logo_w) / 2.0,
        y: safe_y,
        width: logo_w,
        height: logo_h,
    };

    let sizes = TextSizes::for_card(width_mm, height_mm);
    let w_in = width_mm / MM_PER_INCH;
    let h_in = height_mm / MM_PER_INCH;
    let pw_in = page_w / MM_PER_INCH;
    let ph_in = page_h / MM_PER_INCH;
    let px = |inches: f64| (inches * PRINT_DPI).floor() as u64;

    enum Style {
        Desc,
        Header,
        Data,
    }
    // (space before in mm, style, bold prefix, text)
    let block: [(f64, Style, &str, String); 9] = [
        (0.0, Style::Desc, txt.red_label, txt.red_desc.to_string()),
        (0.0, Style::Desc, txt.blue_label, txt.blue_desc.to_string()),
        (0.0, Style::Desc, txt.green_label, txt.green_desc.to_string()),
        (3.0, Style::Header, txt.card_header, String::new()),
        (
            0.0,
            Style::Data,
            "",
            format!(
                "{}x{} mm | {:.2}\"x{:.2}\"",
                fmt_mm(width_mm),
                fmt_mm(height_mm),
                w_in,
                h_in
            ),
        ),
        (0.0, Style::Data, "", format!("300 DPI: {}x{} px", px(w_in), px(h_in))),
        (2.0, Style::Header, txt.file_header, String::new()),
        (
            0.0,
            Style::Data,
            "",
            format!("{:.1}x{:.1} mm | {:.2}\"x{:.2}\"", page_w, page_h, pw_in, ph_in),
        ),
        (0.0, Style::Data, "", format!("300 DPI: {}x{} px", px(pw_in), px(ph_in))),
    ];

    let mut lines = Vec::with_capacity(block.len());
    let mut cursor = safe_y + 1.0 + logo_h + 2.0;
    for (space, style, bold, rest) in block {
        let size = match style {
            Style::Desc => sizes.desc,
            Style::Header => {
                cursor += 3.0 * MM_PER_PT;
                sizes.header
            }
            Style::Data => sizes.data,
        };
        cursor += space;
        let size_mm = size * MM_PER_PT;
        let body = match (bold.is_empty(), rest.is_empty()) {
            (true, _) => svg_escape(&rest),
            (false, true) => format!("<tspan font-weight=\"bold\">{}</tspan>", svg_escape(bold)),
            (false, false) => format!(
                "<tspan font-weight=\"bold\">{}:</tspan> {}",
                svg_escape(bold),
                svg_escape(&rest)
            ),
        };
        lines.push(TextLine {
            baseline: cursor + size_mm,
            size_mm,
            body,
        });
        cursor += (size + 2.0) * MM_PER_PT;
    }

    let svg = CardSheet {
        width_mm: page_w,
        height_mm: page_h,
        title: &title,
        cut_path,
        safe_path,
        logo,
        logo_box,
        lines,
    }
    .to_string();

    tracing::debug!(%filename, logo = logo.is_some(), "built card template");
    Ok(CardTemplate {
        svg,
        filename,
        title,
        width_mm: page_w,
        height_mm: page_h,
    })
}

struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

struct TextLine {
    baseline: f64,
    size_mm: f64,
    /// Already escaped markup.
    body: String,
}

/// Everything the template draws, in page millimetres.
struct CardSheet<'a> {
    width_mm: f64,
    height_mm: f64,
    title: &'a str,
    cut_path: String,
    safe_path: String,
    logo: Option<&'a Logo>,
    logo_box: Rect,
    lines: Vec<TextLine>,
}

impl fmt::Display for CardSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (self.width_mm, self.height_mm);
        let (cut_path, safe_path) = (&self.cut_path, &self.safe_path);
        writeln!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">",
            w = fmt_mm(w),
            h = fmt_mm(h)
        )?;
        writeln!(f, "<title>{}</title>", svg_escape(self.title))?;
        writeln!(
            f,
            "<defs><clipPath id=\"unsafe\"><path clip-rule=\"evenodd\" d=\"{cut_path} {safe_path}\"/></clipPath></defs>"
        )?;

        // bleed: the page minus the cut shape
        writeln!(
            f,
            "<path id=\"BLEED\" fill=\"#ff0000\" fill-opacity=\"0.3\" fill-rule=\"evenodd\" d=\"M0 0 H{} V{} H0 Z {cut_path}\"/>",
            fmt_mm(w),
            fmt_mm(h)
        )?;

        // hatching between the cut and safe outlines
        writeln!(
            f,
            "<g id=\"UNSAFE\" clip-path=\"url(#unsafe)\" stroke=\"#0000ff\" stroke-opacity=\"0.4\" stroke-width=\"{}\">",
            fmt_mm(0.3 * MM_PER_PT)
        )?;
        let mut i = 0.0;
        while i < w + h {
            writeln!(
                f,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"0\"/>",
                fmt_mm(i - h),
                fmt_mm(h),
                fmt_mm(i)
            )?;
            i += HATCH_PITCH_MM;
        }
        writeln!(f, "</g>")?;

        writeln!(
            f,
            "<path id=\"CUT\" fill=\"none\" stroke=\"#000000\" stroke-width=\"{}\" d=\"{cut_path}\"/>",
            fmt_mm(0.8 * MM_PER_PT)
        )?;

        let r = &self.logo_box;
        let (x0, y0) = (fmt_mm(r.x), fmt_mm(r.y));
        match self.logo {
            Some(l) => writeln!(
                f,
                "<image id=\"LOGO\" x=\"{x0}\" y=\"{y0}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" xlink:href=\"{}\"/>",
                fmt_mm(r.width),
                fmt_mm(r.height),
                l.data_uri
            )?,
            None => {
                let (x1, y1) = (fmt_mm(r.x + r.width), fmt_mm(r.y + r.height));
                writeln!(
                    f,
                    "<g id=\"LOGO-PLACEHOLDER\" fill=\"none\" stroke=\"#ff0000\" stroke-width=\"{}\">",
                    fmt_mm(MM_PER_PT)
                )?;
                writeln!(
                    f,
                    "<rect x=\"{x0}\" y=\"{y0}\" width=\"{}\" height=\"{}\"/>",
                    fmt_mm(r.width),
                    fmt_mm(r.height)
                )?;
                writeln!(f, "<line x1=\"{x0}\" y1=\"{y0}\" x2=\"{x1}\" y2=\"{y1}\"/>")?;
                writeln!(f, "<line x1=\"{x0}\" y1=\"{y1}\" x2=\"{x1}\" y2=\"{y0}\"/>")?;
                writeln!(f, "</g>")?;
            }
        }

        writeln!(
            f,
            "<g id=\"TEXT\" font-family=\"sans-serif\" text-anchor=\"middle\" fill=\"#000000\">"
        )?;
        let cx = fmt_mm(w / 2.0);
        for line in &self.lines {
            writeln!(
                f,
                "<text x=\"{cx}\" y=\"{}\" font-size=\"{}\">{}</text>",
                fmt_mm(line.baseline),
                fmt_mm(line.size_mm),
                line.body
            )?;
        }
        writeln!(f, "</g>")?;
        writeln!(f, "</svg>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::tests::tiny_png;

    #[test]
    fn page_adds_bleed_on_every_side() {
        let t = card_template_svg(85.0, 55.0, Language::En, None).unwrap();
        assert_eq!(t.width_mm, 91.0);
        assert_eq!(t.height_mm, 61.0);
        assert!(t.svg.contains("width=\"91mm\" height=\"61mm\" viewBox=\"0 0 91 61\""));
        assert_eq!(t.filename, "template_85x55mm_EN.pdf");
        assert_eq!(t.title, "Template 85x55 EN");
    }

    #[test]
    fn missing_logo_draws_a_placeholder() {
        let t = card_template_svg(85.0, 55.0, Language::En, None).unwrap();
        assert!(t.svg.contains("id=\"LOGO-PLACEHOLDER\""));
        assert!(!t.svg.contains("<image"));
        // 30 x 10 mm at full scale
        let t = card_template_svg(100.0, 70.0, Language::En, None).unwrap();
        assert!(t.svg.contains("<rect x=\"38\" y=\"7\" width=\"30\" height=\"10\"/>"));
    }

    #[test]
    fn logo_keeps_its_aspect() {
        let logo = Logo::from_png_bytes(&tiny_png(20, 10)).unwrap();
        let t = card_template_svg(100.0, 70.0, Language::Pl, Some(&logo)).unwrap();
        assert!(t.svg.contains("<image id=\"LOGO\" x=\"38\" y=\"7\" width=\"30\" height=\"15\""));
        assert_eq!(t.filename, "template_100x70mm_PL.pdf");
        assert_eq!(t.title, "Szablon 100x70 PL");
        assert!(t.svg.contains("WYMIAR KARTY (NETTO)"));
    }

    #[test]
    fn legend_and_pixel_sizes() {
        let t = card_template_svg(85.0, 55.0, Language::En, None).unwrap();
        assert!(t.svg.contains("<tspan font-weight=\"bold\">Red Area (30%):</tspan> Bleed - will be trimmed off."));
        // inch marks go through svg_escape
        assert!(t.svg.contains("85x55 mm | 3.35&quot;x2.17&quot;"));
        assert!(t.svg.contains("300 DPI: 1003x649 px"));
        assert!(t.svg.contains("91.0x61.0 mm | 3.58&quot;x2.40&quot;"));
        assert!(!t.svg.contains("3.35\"x"));
        assert!(t.svg.contains("300 DPI: 1074x720 px"));
    }

    #[test]
    fn text_shrinks_on_small_cards() {
        let big = TextSizes::for_card(150.0, 100.0);
        assert_eq!(big, TextSizes { desc: 7.0, header: 8.0, data: 8.0 });
        let mid = TextSizes::for_card(90.0, 80.0);
        assert!((mid.desc - 5.6).abs() < 1e-9);
        assert!((mid.header - 6.4).abs() < 1e-9);
        let small = TextSizes::for_card(85.0, 55.0);
        assert_eq!(small, TextSizes { desc: 3.5, header: 4.0, data: 4.0 });
    }

    #[test]
    fn rejects_unusable_sizes() {
        for (w, h) in [(0.0, 50.0), (-5.0, 50.0), (f64::NAN, 50.0), (50.0, f64::INFINITY), (8.0, 50.0)] {
            assert!(matches!(
                card_template_svg(w, h, Language::En, None),
                Err(DielineError::InvalidInput { .. })
            ));
        }
    }
}
