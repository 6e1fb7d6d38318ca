use png::{BitDepth, ColorType, Compression, Encoder, Filter};

/// RGBA8 -> PNG bytes. Fixed filter and compression, so identical pixels
/// always produce identical files.
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(Filter::NoFilter);
        enc.set_compression(Compression::Balanced);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    Ok(buf)
}
