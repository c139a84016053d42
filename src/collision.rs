use crate::config::GameConfig;
use crate::entities::{Cannon, EntityId, Obstacle, Projectile};

/// An axis-aligned box in play-area coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn overlaps_horizontally(&self, other: &Hitbox) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// A projectile that struck an obstacle this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: EntityId,
    pub obstacle: EntityId,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// An obstacle reached the floor line
    Floor,
    /// An obstacle landed on the cannon
    Cannon,
}

/// Pair every projectile with the first obstacle it overlaps, in store order.
///
/// Projectiles are matched independently, so two shots inside the same rock
/// both score. Removal is left to the caller once every hit is collected.
pub fn find_hits(projectiles: &[Projectile], obstacles: &[Obstacle], config: &GameConfig) -> Vec<Hit> {
    projectiles
        .iter()
        .filter_map(|projectile| {
            let shot = projectile.hitbox(config.projectile);
            obstacles
                .iter()
                .find(|obstacle| shot.overlaps(&obstacle.hitbox(config.obstacle)))
                .map(|obstacle| Hit {
                    projectile: projectile.id,
                    obstacle: obstacle.id,
                })
        })
        .collect()
}

/// First obstacle that ends the game, if any. Stops at the first match.
pub fn check_game_over(
    obstacles: &[Obstacle],
    cannon: &Cannon,
    config: &GameConfig,
) -> Option<(EntityId, EndCause)> {
    let floor = config.floor_y();
    let cannon_box = cannon.hitbox(config);

    for obstacle in obstacles {
        let rock = obstacle.hitbox(config.obstacle);

        if rock.bottom() >= floor {
            return Some((obstacle.id, EndCause::Floor));
        }

        let in_cannon_band = rock.bottom() >= cannon_box.y && rock.y <= floor;
        if in_cannon_band && rock.overlaps_horizontally(&cannon_box) {
            return Some((obstacle.id, EndCause::Cannon));
        }
    }

    None
}
