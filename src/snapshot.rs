use crate::entities::EntityId;
use crate::session::Phase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
    pub cannon_x: f32,
    pub projectiles: Vec<Position>,
    pub obstacles: Vec<Position>,
    pub play_width: f32,
    pub play_height: f32,
}

impl Snapshot {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
