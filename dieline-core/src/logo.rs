use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A PNG logo ready to be embedded as `<image href="data:...">`.
#[derive(Clone, Debug, PartialEq)]
pub struct Logo {
    pub width_px: u32,
    pub height_px: u32,
    pub data_uri: String,
}

impl Logo {
    /// A missing or unreadable file yields `None`: the drawing simply goes
    /// without a logo.
    pub fn load(path: &Path) -> Option<Logo> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "logo not found, skipping");
                return None;
            }
        };
        let logo = Logo::from_png_bytes(&bytes);
        if logo.is_none() {
            tracing::warn!(path = %path.display(), "logo is not a readable PNG, skipping");
        }
        logo
    }

    pub fn from_png_bytes(bytes: &[u8]) -> Option<Logo> {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info().ok()?;
        let (width_px, height_px) = (reader.info().width, reader.info().height);
        if width_px == 0 || height_px == 0 {
            return None;
        }
        Some(Logo {
            width_px,
            height_px,
            data_uri: format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
        })
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width_px as f64 / self.height_px as f64
    }
}
