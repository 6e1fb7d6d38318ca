use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use dieline_core::raster::encode_rgba_to_png_bytes;

/// usvg resolves `mm` at this resolution.
const SVG_DPI: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pdf,
    Svg,
    Png,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Format::Pdf),
            "svg" => Some(Format::Svg),
            "png" => Some(Format::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

/// Parse options with a font database: the `--font` file first (and mapped
/// to `sans-serif`), then whatever the system has.
pub fn svg_options(font: Option<&Path>) -> Result<usvg::Options<'static>, Box<dyn Error>> {
    let mut opt = usvg::Options::default();
    let mut fontdb = usvg::fontdb::Database::new();
    if let Some(path) = font {
        fontdb.load_font_data(fs::read(path)?);
        // Map generic 'sans-serif' to the given font family
        let family_name = {
            let mut it = fontdb.faces();
            if let Some(face) = it.next() {
                face.families.first().map(|(n, _)| n.clone())
            } else {
                None
            }
        };
        match family_name {
            Some(name) => fontdb.set_sans_serif_family(name),
            None => tracing::warn!(path = %path.display(), "no usable face in font file"),
        }
    }
    fontdb.load_system_fonts();
    tracing::debug!(faces = fontdb.len(), "font database ready");
    opt.fontdb = Arc::new(fontdb);
    Ok(opt)
}

fn parse(svg: &str, opt: &usvg::Options) -> Result<usvg::Tree, Box<dyn Error>> {
    Ok(usvg::Tree::from_str(svg, opt).map_err(|e| format!("SVG parse error: {e:?}"))?)
}

/// One PDF page the physical size of the drawing.
pub fn svg_to_pdf(svg: &str, opt: &usvg::Options) -> Result<Vec<u8>, Box<dyn Error>> {
    let tree = parse(svg, opt)?;
    let mut page = svg2pdf::PageOptions::default();
    page.dpi = SVG_DPI;
    let pdf = svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| format!("PDF conversion error: {e:?}"))?;
    Ok(pdf)
}

/// Raster preview on white, `px_per_mm` pixels per millimetre.
pub fn svg_to_png(
    svg: &str,
    opt: &usvg::Options,
    px_per_mm: f32,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let tree = parse(svg, opt)?;
    let scale = px_per_mm * MM_PER_INCH / SVG_DPI;
    let size = tree.size();
    let w_px = (size.width() * scale).round().max(1.0) as u32;
    let h_px = (size.height() * scale).round().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px).ok_or("pixmap alloc failed")?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pm);
    Ok(encode_rgba_to_png_bytes(w_px, h_px, pixmap.data())?)
}

/// Convert `svg` to `format` and write it to `path`.
pub fn write_output(
    svg: &str,
    format: Format,
    path: &Path,
    font: Option<&Path>,
    px_per_mm: f32,
) -> Result<(), Box<dyn Error>> {
    let bytes = match format {
        Format::Svg => svg.as_bytes().to_vec(),
        Format::Pdf => svg_to_pdf(svg, &svg_options(font)?)?,
        Format::Png => svg_to_png(svg, &svg_options(font)?, px_per_mm)?,
    };
    fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), ?format, "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dieline_core::{BoxParameters, RenderOptions, generate_box_svg};

    const SQUARE: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20mm\" height=\"10mm\" viewBox=\"0 0 20 10\"><line x1=\"0\" y1=\"0\" x2=\"20\" y2=\"10\" stroke=\"#ff0000\"/></svg>";

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/box.PDF")), Some(Format::Pdf));
        assert_eq!(Format::from_path(Path::new("net.svg")), Some(Format::Svg));
        assert_eq!(Format::from_path(Path::new("net.png")), Some(Format::Png));
        assert_eq!(Format::from_path(Path::new("net")), None);
        assert_eq!(Format::from_path(Path::new("net.dxf")), None);
    }

    #[test]
    fn png_is_scaled_per_millimetre() {
        let opt = usvg::Options::default();
        let png = svg_to_png(SQUARE, &opt, 4.0).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width and height, big endian
        assert_eq!(u32::from_be_bytes(png[16..20].try_into().unwrap()), 80);
        assert_eq!(u32::from_be_bytes(png[20..24].try_into().unwrap()), 40);
        assert_eq!(png, svg_to_png(SQUARE, &opt, 4.0).unwrap());
    }

    #[test]
    fn box_net_converts_to_pdf() {
        let p = BoxParameters::new(100.0, 80.0, 40.0, 5.0, 1.5).unwrap();
        let svg = generate_box_svg(&p, &RenderOptions::default()).unwrap();
        let pdf = svg_to_pdf(&svg, &usvg::Options::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn bad_svg_is_an_error() {
        assert!(svg_to_pdf("<svg", &usvg::Options::default()).is_err());
    }

    #[test]
    fn writes_svg_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.svg");
        write_output(SQUARE, Format::Svg, &out, None, 4.0).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), SQUARE);
    }
}
