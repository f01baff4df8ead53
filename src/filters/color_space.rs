//! Color space conversions used by the brightness-only equalizers.
//!
//! ## Conventions
//!
//! - **HSV**: H in degrees 0.0-360.0 (f32), S in 0.0-1.0 (f32),
//!   V = max(R, G, B) kept as an exact u8.
//! - **Lab**: CIE L*a*b* from sRGB with D65 white. L in 0.0-100.0,
//!   a/b roughly -128..128, all f32. Only L is quantized to 8 bits
//!   (`L * 255 / 100`) when it is equalized.
//!
//! Hue/saturation and a/b stay in f32 across a round trip, so the only
//! loss on untouched channels is the final rounding back to u8 RGB.

/// HSV pixel with an 8-bit value channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: u8,
}

/// CIE L*a*b* pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

// ============================================================================
// HSV
// ============================================================================

/// Convert an 8-bit RGB pixel to HSV.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;

    if max == min {
        return Hsv { h: 0.0, s: 0.0, v };
    }

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let d = max as f32 - min as f32;
    let s = d / max as f32;

    let h = if max == r {
        60.0 * ((gf - bf) / d)
    } else if max == g {
        60.0 * ((bf - rf) / d + 2.0)
    } else {
        60.0 * ((rf - gf) / d + 4.0)
    };

    Hsv {
        h: h.rem_euclid(360.0),
        s,
        v,
    }
}

/// Convert HSV back to RGB.
/// Output: (r, g, b) in 0.0-255.0, not yet rounded.
#[inline]
pub fn hsv_to_rgb(h: f32, s: f32, v: u8) -> (f32, f32, f32) {
    let v = v as f32;
    if s <= 0.0 {
        return (v, v, v);
    }

    let c = v * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match hp.floor() as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

// ============================================================================
// Lab
// ============================================================================

/// D65 reference white.
const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.00000;
const D65_Z: f32 = 1.08883;

/// Linear sRGB to XYZ (D65).
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// XYZ (D65) to linear sRGB.
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.969_266, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / LAB_KAPPA
    }
}

#[inline]
fn mat_mul(m: &[[f32; 3]; 3], v: (f32, f32, f32)) -> (f32, f32, f32) {
    (
        m[0][0] * v.0 + m[0][1] * v.1 + m[0][2] * v.2,
        m[1][0] * v.0 + m[1][1] * v.1 + m[1][2] * v.2,
        m[2][0] * v.0 + m[2][1] * v.1 + m[2][2] * v.2,
    )
}

/// Convert an 8-bit sRGB pixel to Lab.
#[inline]
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    let linear = (
        srgb_to_linear(r as f32 / 255.0),
        srgb_to_linear(g as f32 / 255.0),
        srgb_to_linear(b as f32 / 255.0),
    );
    let (x, y, z) = mat_mul(&SRGB_TO_XYZ, linear);

    let fx = lab_f(x / D65_X);
    let fy = lab_f(y / D65_Y);
    let fz = lab_f(z / D65_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert Lab back to sRGB.
/// Output: (r, g, b) in 0.0-255.0, clamped to gamut but not rounded.
#[inline]
pub fn lab_to_rgb(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let y = if l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        l / LAB_KAPPA
    };
    let xyz = (lab_f_inv(fx) * D65_X, y * D65_Y, lab_f_inv(fz) * D65_Z);

    let (lr, lg, lb) = mat_mul(&XYZ_TO_SRGB, xyz);
    let encode = |c: f32| linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0;
    (encode(lr), encode(lg), encode(lb))
}

/// Quantize L (0-100) to the 8-bit scale used for equalization.
#[inline]
pub fn lightness_to_u8(l: f32) -> u8 {
    (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
}

/// Expand an 8-bit lightness back to L (0-100).
#[inline]
pub fn lightness_from_u8(l: u8) -> f32 {
    l as f32 * 100.0 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::core::round_to_u8;
    use approx::assert_relative_eq;

    fn roundtrip_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let hsv = rgb_to_hsv(r, g, b);
        let (nr, ng, nb) = hsv_to_rgb(hsv.h, hsv.s, hsv.v);
        (round_to_u8(nr), round_to_u8(ng), round_to_u8(nb))
    }

    #[test]
    fn test_rgb_hsv_primaries() {
        let red = rgb_to_hsv(255, 0, 0);
        assert_relative_eq!(red.h, 0.0);
        assert_relative_eq!(red.s, 1.0);
        assert_eq!(red.v, 255);

        let green = rgb_to_hsv(0, 255, 0);
        assert_relative_eq!(green.h, 120.0);

        let blue = rgb_to_hsv(0, 0, 255);
        assert_relative_eq!(blue.h, 240.0);

        let magenta = rgb_to_hsv(255, 0, 128);
        assert!(magenta.h > 300.0 && magenta.h < 360.0);
    }

    #[test]
    fn test_hsv_gray_has_no_saturation() {
        let gray = rgb_to_hsv(90, 90, 90);
        assert_eq!(gray.s, 0.0);
        assert_eq!(gray.v, 90);
    }

    #[test]
    fn test_rgb_hsv_roundtrip_exact() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(51) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    assert_eq!(roundtrip_hsv(r, g, b), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn test_lab_reference_values() {
        let white = rgb_to_lab(255, 255, 255);
        assert_relative_eq!(white.l, 100.0, epsilon = 0.01);
        assert_relative_eq!(white.a, 0.0, epsilon = 0.01);
        assert_relative_eq!(white.b, 0.0, epsilon = 0.01);

        let black = rgb_to_lab(0, 0, 0);
        assert_relative_eq!(black.l, 0.0, epsilon = 1e-4);

        // sRGB red: L 53.24, a 80.09, b 67.20
        let red = rgb_to_lab(255, 0, 0);
        assert_relative_eq!(red.l, 53.24, epsilon = 0.05);
        assert_relative_eq!(red.a, 80.09, epsilon = 0.1);
        assert_relative_eq!(red.b, 67.20, epsilon = 0.1);
    }

    #[test]
    fn test_rgb_lab_roundtrip() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(51) {
                    let lab = rgb_to_lab(r as u8, g as u8, b as u8);
                    let (nr, ng, nb) = lab_to_rgb(lab.l, lab.a, lab.b);
                    assert!((nr - r as f32).abs() < 0.6, "r {} -> {}", r, nr);
                    assert!((ng - g as f32).abs() < 0.6, "g {} -> {}", g, ng);
                    assert!((nb - b as f32).abs() < 0.6, "b {} -> {}", b, nb);
                }
            }
        }
    }

    #[test]
    fn test_lightness_quantization() {
        assert_eq!(lightness_to_u8(0.0), 0);
        assert_eq!(lightness_to_u8(100.0), 255);
        assert_eq!(lightness_to_u8(50.0), 128);
        assert_relative_eq!(lightness_from_u8(255), 100.0);
    }
}
