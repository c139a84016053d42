use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    ticks: u64,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
        }
    }

    /// Seed from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// Ticks counted since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Count one tick; returns the spawn position when this tick is a spawn tick
    pub fn tick(&mut self, config: &GameConfig) -> Option<(f32, f32)> {
        self.ticks += 1;
        if self.ticks % u64::from(config.spawn_rate) != 0 {
            return None;
        }

        let max_x = (config.play_width - config.obstacle.w).max(0.0);
        let x = if max_x > 0.0 {
            self.rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        Some((x, -config.obstacle.h))
    }
}
