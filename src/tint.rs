// Excluded-pixel tint, mixed in linear light. The source is 8-bit gray and
// the tint is fixed for the compositor's lifetime, so every fully excluded
// output color is precomputed once per gray level.

use crate::types::{MASK_EXCLUDED, MASK_INCLUDED};

/// sRGB channel value -> linear light (0..1).
fn decode(v: u8) -> f32 {
    let c = v as f32 / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// Linear light -> sRGB channel value.
fn encode(l: f32) -> u8 {
    let l = l.clamp(0.0, 1.0);
    let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
    (s * 255.0).round().clamp(0.0, 255.0) as u8
}

fn pack([r, g, b]: [u8; 3]) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

fn unpack(px: u32) -> [u8; 3] {
    [(px >> 16) as u8, (px >> 8) as u8, px as u8]
}

/// Gray level -> `0x00RRGGBB` of a fully excluded pixel.
pub struct TintTable {
    tinted: [u32; 256],
}

impl TintTable {
    /// `strength` 0 leaves gray untouched, 1 replaces it with `tint`.
    pub fn new(tint: [u8; 3], strength: f32) -> Self {
        let t = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
        let tint = tint.map(decode);
        let mut tinted = [0u32; 256];
        for (gray, out) in tinted.iter_mut().enumerate() {
            let g = decode(gray as u8);
            *out = pack(tint.map(|c| encode((1.0 - t) * g + t * c)));
        }
        Self { tinted }
    }

    pub fn excluded(&self, gray: u8) -> u32 {
        self.tinted[gray as usize]
    }

    /// Color for `gray` under mask value `mask`: plain gray when included,
    /// the full tint when excluded, and a per-channel lerp in between.
    pub fn shade(&self, gray: u8, mask: u8) -> u32 {
        let plain = pack([gray; 3]);
        match mask {
            MASK_INCLUDED => plain,
            MASK_EXCLUDED => self.excluded(gray),
            m => {
                let (w, inv) = (m as u32, 255 - m as u32);
                let [r0, g0, b0] = unpack(plain);
                let [r1, g1, b1] = unpack(self.excluded(gray));
                let mixc = |a: u8, b: u8| ((a as u32 * w + b as u32 * inv + 127) / 255) as u8;
                pack([mixc(r0, r1), mixc(g0, g1), mixc(b0, b1)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_conversion_is_lossless_on_8_bit_values() {
        for v in 0..=255u8 {
            assert_eq!(encode(decode(v)), v);
        }
    }

    #[test]
    fn strength_endpoints() {
        let none = TintTable::new([0xC0, 0x10, 0x10], 0.0);
        assert_eq!(none.excluded(0x80), 0x00_80_80_80);
        let full = TintTable::new([0xC0, 0x10, 0x10], 1.0);
        assert_eq!(full.excluded(0x80), 0x00_C0_10_10);
        assert_eq!(full.excluded(0), 0x00_C0_10_10);
    }

    #[test]
    fn mixing_happens_in_linear_light() {
        let white = TintTable::new([255, 255, 255], 0.5);
        // linear-light midpoint of black and white sits well above 127
        assert!(white.excluded(0) & 0xFF > 180);
    }

    #[test]
    fn shade_follows_mask_value() {
        let lut = TintTable::new([0xC0, 0x10, 0x10], 0.6);
        assert_eq!(lut.shade(0x40, 255), 0x00_40_40_40);
        assert_eq!(lut.shade(0x40, 0), lut.excluded(0x40));
        let [r, g, _] = unpack(lut.shade(0x40, 128));
        let [r_full, g_full, _] = unpack(lut.excluded(0x40));
        assert!(r > 0x40 && r < r_full, "{r}");
        assert!(g < 0x40 && g > g_full, "{g}");
    }
}
