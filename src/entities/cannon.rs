use crate::collision::Hitbox;
use crate::config::GameConfig;

/// The player's cannon. Only its horizontal position changes; it sits on the floor line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cannon {
    pub x: f32,
}

impl Cannon {
    /// A cannon centered in the play area
    pub fn centered(config: &GameConfig) -> Self {
        Self {
            x: config.cannon_start_x(),
        }
    }

    pub fn recenter(&mut self, config: &GameConfig) {
        self.x = config.cannon_start_x();
    }

    /// Shift by `tilt * sensitivity`, clamped to `[0, play_width - cannon_width]`
    pub fn tilt(&mut self, tilt: f32, config: &GameConfig) {
        let max_x = config.cannon_max_x();
        let moved = self.x + tilt * config.tilt_sensitivity;
        // NaN tilt leaves the cannon where it is
        if moved.is_nan() {
            return;
        }
        self.x = moved.clamp(0.0, max_x);
    }

    /// Top edge of the cannon sprite
    pub fn top(config: &GameConfig) -> f32 {
        config.floor_y() - config.cannon.h
    }

    /// Spawn point for a new projectile: centered on the barrel, at the cannon's top edge
    pub fn muzzle(&self, config: &GameConfig) -> (f32, f32) {
        let x = self.x + config.cannon.w / 2.0 - config.projectile.w / 2.0;
        (x, Self::top(config))
    }

    pub fn hitbox(&self, config: &GameConfig) -> Hitbox {
        Hitbox::new(self.x, Self::top(config), config.cannon.w, config.cannon.h)
    }
}
