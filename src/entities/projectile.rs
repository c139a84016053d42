use super::EntityId;
use crate::collision::Hitbox;
use crate::config::Size;

/// A shot fired from the cannon. Travels straight up.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

impl Projectile {
    pub fn new(id: EntityId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn update(&mut self, speed: f32) {
        self.y -= speed;
    }

    /// True once the whole sprite has left through the top edge
    pub fn is_out_of_bounds(&self, size: Size) -> bool {
        self.y <= -size.h
    }

    pub fn hitbox(&self, size: Size) -> Hitbox {
        Hitbox::new(self.x, self.y, size.w, size.h)
    }
}
