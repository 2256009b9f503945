use serde::{Deserialize, Serialize};

/// Opaque 8-bit color as written into border pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(color: [u8; 3]) -> Self {
        Self::new(color[0], color[1], color[2])
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn collides_with_color_key(self, key: Rgb) -> bool {
        self == key
    }

    /// Move one channel a single step away from `key` when the color would
    /// otherwise be keyed out by the overlay.
    pub fn resolve_color_key_collision(self, key: Rgb) -> Self {
        if !self.collides_with_color_key(key) {
            return self;
        }
        let step = |c: u8| if c == u8::MAX { c - 1 } else { c + 1 };
        Self::new(step(self.r), self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    #[default]
    #[serde(alias = "spectrum")]
    FullSpectrum,
    #[serde(alias = "g102", alias = "restricted")]
    RestrictedBand,
}

/// Sub-range of the hue circle used by [`ColorMode::RestrictedBand`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HueBand {
    pub start: f64,
    pub span: f64,
}

impl Default for HueBand {
    fn default() -> Self {
        Self {
            start: 0.5,
            span: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutParams {
    pub size: usize,
    pub mode: ColorMode,
    pub band: HueBand,
    pub saturation: f64,
    pub value: f64,
    pub color_key: Rgb,
}

impl Default for LutParams {
    fn default() -> Self {
        Self {
            size: 720,
            mode: ColorMode::FullSpectrum,
            band: HueBand::default(),
            saturation: 0.88,
            value: 0.95,
            color_key: Rgb::new(1, 1, 1),
        }
    }
}

/// Cyclic hue ramp precomputed once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLut {
    colors: Vec<Rgb>,
}

impl ColorLut {
    pub fn build(params: LutParams) -> Self {
        let size = params.size.max(1);
        let colors = (0..size)
            .map(|i| {
                let mut hue = i as f64 / size as f64;
                if params.mode == ColorMode::RestrictedBand {
                    hue = params.band.start + hue * params.band.span;
                }
                let (r, g, b) = hsv_to_rgb(hue.rem_euclid(1.0), params.saturation, params.value);
                Rgb::new(channel(r), channel(g), channel(b))
                    .resolve_color_key_collision(params.color_key)
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Base index contributed by the global hue phase.
    pub fn phase_offset(&self, phase: f64) -> usize {
        let size = self.colors.len();
        ((phase * size as f64) as usize) % size
    }

    /// LUT index for a point `distance` along a border of length `perimeter`.
    pub fn index_for(&self, offset: usize, distance: f32, perimeter: f32) -> usize {
        let size = self.colors.len();
        if perimeter <= 0.0 {
            return offset % size;
        }
        let along = (distance as f64 / perimeter as f64 * size as f64) as usize;
        (offset + along) % size
    }
}

// Negative or NaN inputs saturate to 0 on the cast.
fn channel(unit: f64) -> u8 {
    (unit * 255.0) as u8
}

pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues_convert_to_expected_channels() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        let (r, g, b) = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(r.abs() < 1e-9 && (g - 1.0).abs() < 1e-9 && b.abs() < 1e-9);
        assert_eq!(hsv_to_rgb(0.25, 0.0, 0.5), (0.5, 0.5, 0.5));
    }

    #[test]
    fn collision_nudge_steps_down_from_saturated_channel() {
        let key = Rgb::new(255, 0, 255);
        assert_eq!(key.resolve_color_key_collision(key), Rgb::new(254, 0, 255));
        let other = Rgb::new(3, 4, 5);
        assert_eq!(other.resolve_color_key_collision(key), other);
    }
}
