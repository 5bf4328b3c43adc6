use crate::random::RandomSource;

/// 8-bit RGB color; channels cannot leave [0, 255] by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Random color with each channel in `[0, 254]`
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: (rng.next_f64() * 255.0).floor() as u8,
            g: (rng.next_f64() * 255.0).floor() as u8,
            b: (rng.next_f64() * 255.0).floor() as u8,
        }
    }

    /// Shift each channel independently by up to `spread / 2` either way
    pub fn jittered<R: RandomSource + ?Sized>(self, rng: &mut R, spread: f64) -> Self {
        Self {
            r: jitter_channel(self.r, (rng.next_f64() - 0.5) * spread),
            g: jitter_channel(self.g, (rng.next_f64() - 0.5) * spread),
            b: jitter_channel(self.b, (rng.next_f64() - 0.5) * spread),
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba::new(self, alpha)
    }
}

fn jitter_channel(base: u8, offset: f64) -> u8 {
    let shifted = base as f64 + offset;
    if shifted.is_nan() {
        return base;
    }
    shifted.round().clamp(0.0, 255.0) as u8
}

/// RGB color with opacity in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub fn new(rgb: Rgb, alpha: f64) -> Self {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        Self { rgb, alpha }
    }

    /// CSS color string for canvas fill and stroke styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}
