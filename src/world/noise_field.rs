use crate::config::worldgen::HeightNoise;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

const X_PRIME: i64 = 341_873_128_712;
const Z_PRIME: i64 = 132_897_987_541;

/// Deterministic value source keyed by world column and seed. Every
/// sample depends only on its inputs, never on sampling order.
pub struct NoiseField {
    seed: u64,
    mode: HeightNoise,
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    pub fn new(seed: u64, mode: HeightNoise) -> Self {
        let mut fbm = Fbm::<Perlin>::new(seed as u32);
        if let HeightNoise::Fractal {
            octaves,
            frequency,
            persistence,
            lacunarity,
            ..
        } = mode
        {
            fbm = fbm
                .set_octaves(octaves)
                .set_frequency(frequency)
                .set_persistence(persistence)
                .set_lacunarity(lacunarity);
        }

        Self { seed, mode, fbm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Integer hash of a world column mixed with the world seed.
    pub fn column_seed(&self, world_x: i32, world_z: i32) -> u64 {
        let mixed = (world_x as i64)
            .wrapping_mul(X_PRIME)
            .wrapping_add((world_z as i64).wrapping_mul(Z_PRIME));
        self.seed.wrapping_add(mixed as u64)
    }

    fn rng(&self, world_x: i32, world_z: i32, salt: u64) -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(self.column_seed(world_x, world_z).wrapping_add(salt))
    }

    /// Terrain height offset for a lattice sample.
    pub fn height_offset(&self, world_x: i32, world_z: i32) -> i32 {
        match self.mode {
            HeightNoise::Jitter { amplitude } if amplitude > 0 => {
                self.rng(world_x, world_z, 0)
                    .gen_range(-amplitude..amplitude)
            }
            HeightNoise::Jitter { .. } => 0,
            HeightNoise::Fractal { amplitude, .. } => {
                let value = self.fbm.get([world_x as f64, world_z as f64]);
                (value * amplitude).round() as i32
            }
        }
    }

    /// Uniform value in `[0, 1)` for a column. Different salts give
    /// independent streams for the same column.
    pub fn chance(&self, world_x: i32, world_z: i32, salt: u64) -> f32 {
        self.rng(world_x, world_z, salt).gen::<f32>()
    }

    /// Uniform integer in `[low, high)` for a column.
    pub fn range(&self, world_x: i32, world_z: i32, salt: u64, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng(world_x, world_z, salt).gen_range(low..high)
    }
}
