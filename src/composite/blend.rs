use crate::foundation::core::Rgba8;
use crate::foundation::math::{mul_div255_u16, premultiply, unpremultiply};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(u16::from(src[i]), dc);
    }
    out
}

/// Source-over for straight-alpha pixels, as stored on the working canvas.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    match (src[3], dst[3]) {
        (0, _) => dst,
        (255, _) | (_, 0) => src,
        _ => unpremultiply(over(premultiply(dst), premultiply(src))),
    }
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
