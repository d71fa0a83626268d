//! Terrain height profile
//!
//! One ground sample per integer x across the play width. The profile is
//! cached and only rebuilt when the dimensions change or on an explicit
//! reseed, so repeated queries are cheap and stable.

use std::f32::consts::TAU;

use crate::config::TerrainStyle;

/// Ground sits this far above the bottom edge
pub const GROUND_MARGIN: f32 = 60.0;
/// Peak of the central hill (Hill style)
pub const HILL_HEIGHT: f32 = 120.0;
/// Hill half-width as a fraction of the play width
pub const HILL_HALF_WIDTH: f32 = 0.2;
/// Fraction of the width at each edge that is ramped to the baseline
pub const EDGE_FRACTION: f32 = 0.1;
/// Highest allowed ground, as a fraction of the height
pub const MIN_Y_FRACTION: f32 = 0.45;
/// Lowest allowed ground, measured up from the bottom edge
pub const MAX_Y_MARGIN: f32 = 20.0;
/// Per-sample noise bound (pixels)
pub const NOISE_AMPLITUDE: f32 = 4.0;

/// Numerical Recipes linear-congruential generator
///
/// Small and fully specified, so a seed reproduces the same profile on any
/// platform and rand version.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ (seed >> 32)) as u32,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Cached terrain profile
#[derive(Debug, Clone)]
pub struct Terrain {
    style: TerrainStyle,
    seed: u64,
    width: f32,
    height: f32,
    samples: Vec<f32>,
}

impl Terrain {
    /// Build a profile for the given play area
    pub fn new(style: TerrainStyle, width: f32, height: f32, seed: u64) -> Self {
        let mut terrain = Self {
            style,
            seed,
            width: 0.0,
            height: 0.0,
            samples: Vec::new(),
        };
        terrain.regenerate(width, height, seed);
        terrain
    }

    pub fn style(&self) -> TerrainStyle {
        self.style
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Baseline ground y (where flat ground and the edges rest)
    pub fn baseline(&self) -> f32 {
        self.height - GROUND_MARGIN
    }

    /// Allowed ground band `(min_y, max_y)`
    ///
    /// On very short arenas the two limits cross; the lower one wins.
    pub fn band(&self) -> (f32, f32) {
        let max_y = self.height - MAX_Y_MARGIN;
        ((self.height * MIN_Y_FRACTION).min(max_y), max_y)
    }

    /// Rebuild only if the dimensions differ from the cached ones
    ///
    /// Returns true if the profile was rebuilt.
    pub fn ensure(&mut self, width: f32, height: f32) -> bool {
        if width == self.width && height == self.height && !self.samples.is_empty() {
            return false;
        }
        self.regenerate(width, height, self.seed);
        true
    }

    /// Rebuild unconditionally with a (possibly new) seed
    pub fn regenerate(&mut self, width: f32, height: f32, seed: u64) {
        self.width = finite_or_zero(width);
        self.height = finite_or_zero(height);
        self.seed = seed;

        let count = self.width.floor() as usize + 1;
        self.samples = match self.style {
            TerrainStyle::Flat => vec![self.baseline(); count],
            TerrainStyle::Hill => (0..count).map(|x| self.hill_sample(x as f32)).collect(),
            TerrainStyle::Procedural => self.procedural_samples(count),
        };

        log::debug!(
            "Terrain regenerated: {} {}x{} seed={} ({} samples)",
            self.style.as_str(),
            self.width,
            self.height,
            self.seed,
            self.samples.len()
        );
    }

    /// Switch style and rebuild
    pub fn set_style(&mut self, style: TerrainStyle) {
        if style != self.style {
            self.style = style;
            self.regenerate(self.width, self.height, self.seed);
        }
    }

    /// Ground y at horizontal position x
    ///
    /// x is clamped into [0, width] and floored to the nearest sample.
    pub fn height_at(&self, x: f32) -> f32 {
        if self.samples.is_empty() {
            return self.baseline();
        }
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, self.width) };
        let idx = (x.floor() as usize).min(self.samples.len() - 1);
        self.samples[idx]
    }

    /// Raw samples (one per integer x), for drawing
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn hill_sample(&self, x: f32) -> f32 {
        let base = self.baseline();
        let center = self.width / 2.0;
        let half_width = self.width * HILL_HALF_WIDTH;
        let dx = (x - center).abs();
        if half_width <= 0.0 || dx > half_width {
            return base;
        }
        let t = dx / half_width;
        base - HILL_HEIGHT * (1.0 - t * t)
    }

    fn procedural_samples(&self, count: usize) -> Vec<f32> {
        let mut lcg = Lcg::new(self.seed);

        // Two layered waves: broad hills plus finer ridges
        let freq1 = lcg.range(0.8, 2.0);
        let phase1 = lcg.range(0.0, TAU);
        let amp1 = lcg.range(40.0, 90.0);
        let freq2 = lcg.range(3.0, 6.0);
        let phase2 = lcg.range(0.0, TAU);
        let amp2 = lcg.range(10.0, 30.0);

        let base = self.baseline();
        let (min_y, max_y) = self.band();
        let width = self.width.max(1.0);

        (0..count)
            .map(|i| {
                let t = i as f32 / width;
                let wave = amp1 * (TAU * freq1 * t + phase1).sin()
                    + amp2 * (TAU * freq2 * t + phase2).sin();
                let noise = lcg.range(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
                // Raise ground only; valleys below the baseline are shallow
                let relief = if wave > 0.0 { wave } else { wave * 0.3 };
                let y = base - (relief + noise) * edge_factor(t);
                y.clamp(min_y, max_y)
            })
            .collect()
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Linear ramp to zero across the outer `EDGE_FRACTION` on both sides
fn edge_factor(t: f32) -> f32 {
    if t < EDGE_FRACTION {
        (t / EDGE_FRACTION).max(0.0)
    } else if t > 1.0 - EDGE_FRACTION {
        ((1.0 - t) / EDGE_FRACTION).max(0.0)
    } else {
        1.0
    }
}
