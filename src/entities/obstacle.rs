use super::EntityId;
use crate::collision::Hitbox;
use crate::config::Size;

/// A falling rock
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

impl Obstacle {
    pub fn new(id: EntityId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn update(&mut self, speed: f32) {
        self.y += speed;
    }

    /// Obstacles linger one sprite height below the bottom before they are dropped
    pub fn is_out_of_bounds(&self, size: Size, play_height: f32) -> bool {
        self.y >= play_height + size.h
    }

    pub fn hitbox(&self, size: Size) -> Hitbox {
        Hitbox::new(self.x, self.y, size.w, size.h)
    }
}
