//! Seeded trajectory source, hue table, and the pixel canvas the kicked
//! rotation is plotted onto.

use std::f64::consts::PI;

use crate::settings::{CameraOffset, SimulationSettings};

/// xorshift64* (12/25/27 shift triple, canonical odd multiplier). This exact
/// generator is part of the share-code contract: swapping it out would change
/// the image every saved blob reproduces.
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    const SEED_MIX: u64 = 0xD1B5_4A32_9C8E_2711;

    pub fn new(seed: u64) -> Self {
        let state = seed ^ Self::SEED_MIX;
        // xorshift sticks at zero
        Self {
            state: if state == 0 { Self::SEED_MIX } else { state },
        }
    }

    /// Seeds from the wall clock, for draws that must differ run to run.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(2685821657736338717)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform draw in `[min, max)`; a reversed range draws from `(max, min]`
    /// and still consumes exactly one generator output.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

/// One color per outer trajectory: hue sweeps the wheel at full saturation
/// and brightness.
pub fn build_color_table(outer_iterations: u32) -> Vec<[u8; 3]> {
    (0..outer_iterations)
        .map(|i| {
            let hue = f64::from(i) * 360.0 / f64::from(outer_iterations);
            hsb_to_rgb(hue, 100.0, 100.0)
        })
        .collect()
}

fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> [u8; 3] {
    let s = saturation / 100.0;
    let b = brightness / 100.0;
    let k = |n: f64| (n + hue / 60.0) % 6.0;
    let f = |n: f64| b * (1.0 - s * k(n).min(4.0 - k(n)).min(1.0).max(0.0));
    [
        (255.0 * f(5.0)).round() as u8,
        (255.0 * f(3.0)).round() as u8,
        (255.0 * f(1.0)).round() as u8,
    ]
}

pub struct ChaosCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    colors: Vec<[u8; 3]>,
}

impl ChaosCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
            colors: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height * 4];
    }

    pub fn rebuild_colors(&mut self, outer_iterations: u32) {
        self.colors = build_color_table(outer_iterations);
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Full recompute: clears to opaque black, reseeds from `settings.seed`,
    /// iterates the kicked rotation and plots every iterate. Out-of-bounds
    /// (and NaN) coordinates are dropped; later points overwrite earlier
    /// ones. Expects `color_count() == settings.outer_iterations`.
    pub fn render(&mut self, settings: &SimulationSettings, camera: CameraOffset) {
        debug_assert_eq!(self.colors.len(), settings.outer_iterations as usize);

        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[0, 0, 0, 255]);
        }

        let mut rng = SeededRng::new(settings.seed);

        let angle = settings.pi_factor * PI / f64::from(settings.periodicity);
        let (sin_a, cos_a) = angle.sin_cos();
        let half_width = self.width as f64 / 2.0;
        let half_height = self.height as f64 / 2.0;
        let k = settings.coupling_constant;

        for i in 0..settings.outer_iterations as usize {
            let mut x = rng.uniform(settings.offset_min, settings.offset_max);
            let mut y = rng.uniform(settings.offset_min, settings.offset_max);
            let color = self.colors[i];

            for _ in 0..settings.inner_iterations {
                let x_temp = x + k * y.sin();
                let new_x = x_temp * cos_a + y * sin_a;
                let new_y = -x_temp * sin_a + y * cos_a;
                x = new_x;
                y = new_y;

                let pixel_x = (half_width + (x + camera.x) * settings.scale).round();
                let pixel_y = (half_height + (y + camera.y) * settings.scale).round();

                if pixel_x >= 0.0
                    && pixel_x < self.width as f64
                    && pixel_y >= 0.0
                    && pixel_y < self.height as f64
                {
                    let idx = 4 * (pixel_y as usize * self.width + pixel_x as usize);
                    self.pixels[idx..idx + 3].copy_from_slice(&color);
                    self.pixels[idx + 3] = 255;
                }
            }
        }
    }
}
