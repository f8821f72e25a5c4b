use anyhow::Context;

use crate::foundation::error::GlyphResult;

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_still(bytes: &[u8]) -> GlyphResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
