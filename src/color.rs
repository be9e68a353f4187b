//! Minimal CSS color handling for fills and strokes.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Channel multiplier base used by `brighter`.
const BRIGHTER: f64 = 1.0 / 0.7;

/// An sRGB color with channels in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). Anything else is `None`.
    #[must_use]
    pub fn parse(css: &str) -> Option<Self> {
        let hex = css.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        }
    }

    /// Brighten by `k` steps; each step divides darkness by 0.7.
    #[must_use]
    pub fn brighter(self, k: f64) -> Self {
        let f = BRIGHTER.powf(k);
        Self::new(self.r * f, self.g * f, self.b * f)
    }

    /// CSS `rgb()` string with channels rounded and clamped to `0..=255`.
    #[must_use]
    pub fn to_css(self) -> String {
        let c = |v: f64| v.round().clamp(0.0, 255.0);
        format!("rgb({}, {}, {})", c(self.r), c(self.g), c(self.b))
    }
}

fn channel(hex: &str) -> Option<f64> {
    match u8::from_str_radix(hex, 16) {
        Ok(v) => Some(f64::from(v)),
        Err(_) => None,
    }
}
