use crate::foundation::error::{GlyphError, GlyphResult};

/// One RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Screen-blend `top` onto `bottom`.
///
/// Colors combine as `1 - (1 - top) * (1 - bottom)` in normalized space, alpha as
/// `top + bottom * (1 - top)`, and the color result is multiplied by that alpha.
pub fn screen(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let ba = unit(bottom[3]);
    let ta = unit(top[3]);
    let alpha = (ta + ba * (1.0 - ta)).clamp(0.0, 1.0);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = 1.0 - (1.0 - unit(top[i])) * (1.0 - unit(bottom[i]));
        out[i] = to_u8(c.clamp(0.0, 1.0) * alpha);
    }
    out[3] = to_u8(alpha);
    out
}

/// Screen-blend `top` onto `bottom` over equal-length RGBA8 buffers.
pub fn screen_in_place(bottom: &mut [u8], top: &[u8]) -> GlyphResult<()> {
    if bottom.len() != top.len() || !bottom.len().is_multiple_of(4) {
        return Err(GlyphError::validation(
            "screen_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (b, t) in bottom.chunks_exact_mut(4).zip(top.chunks_exact(4)) {
        let out = screen([b[0], b[1], b[2], b[3]], [t[0], t[1], t[2], t[3]]);
        b.copy_from_slice(&out);
    }
    Ok(())
}

/// A straight-alpha pixel pasted onto a fully transparent layer using its own alpha as
/// the mask. Every channel, alpha included, is scaled by the pixel's alpha.
pub fn mask_onto_transparent(px: Rgba8) -> Rgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        mul_div255(a, a),
    ]
}

fn unit(v: u8) -> f64 {
    f64::from(v) / 255.0
}

// Truncating conversion; the epsilon absorbs the error of the `/ 255 * 255` round trip.
fn to_u8(v: f64) -> u8 {
    (v * 255.0 + 1e-9).floor().clamp(0.0, 255.0) as u8
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
