//! Complex additive white Gaussian noise generator
//!
//! Uses the Box-Muller transform for Gaussian samples. Each call to the
//! transform yields two independent normals, which become the real and
//! imaginary parts of one circular complex sample.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// Circular complex AWGN with configurable total power E[|n|²]
pub struct ComplexNoise {
    /// Standard deviation per real component (sqrt(power / 2))
    component_std: f64,

    rng: ChaCha8Rng,
}

impl ComplexNoise {
    /// Create a generator seeded directly from `seed`.
    pub fn new(noise_power: f64, seed: u64) -> Self {
        Self {
            component_std: (noise_power / 2.0).sqrt(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a generator whose seed is drawn from a parent RNG.
    pub fn from_rng(noise_power: f64, seed_rng: &mut ChaCha8Rng) -> Self {
        let seed: u64 = seed_rng.gen();
        Self::new(noise_power, seed)
    }

    /// Total noise power this generator was configured for
    pub fn power(&self) -> f64 {
        2.0 * self.component_std * self.component_std
    }

    /// Next complex noise sample
    pub fn next_sample(&mut self) -> Complex64 {
        let u1: f64 = self.rng.gen();
        let u2: f64 = self.rng.gen();

        // Avoid ln(0)
        let u1 = u1.max(1e-300);

        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        Complex64::new(r * theta.cos(), r * theta.sin()) * self.component_std
    }

    /// Add noise to every sample of `signal` in place
    pub fn add_to(&mut self, signal: &mut [Complex64]) {
        for s in signal.iter_mut() {
            *s += self.next_sample();
        }
    }
}
