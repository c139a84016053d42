use std::collections::HashSet;

use log::debug;

use crate::collision::Hit;
use crate::config::GameConfig;
use crate::entities::{EntityId, Obstacle, Projectile};

#[derive(Debug, Clone)]
pub struct EntityStore {
    projectiles: Vec<Projectile>,
    obstacles: Vec<Obstacle>,
    /// Never reset, so ids stay unique across sessions
    next_id: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.obstacles.is_empty()
    }

    pub fn fire(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, x, y));
        id
    }

    pub fn spawn_obstacle(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle::new(id, x, y));
        id
    }

    /// Move every entity one tick, then drop whatever left the visible range
    pub fn advance(&mut self, obstacle_speed: f32, config: &GameConfig) {
        for projectile in &mut self.projectiles {
            projectile.update(config.projectile_speed);
        }
        for obstacle in &mut self.obstacles {
            obstacle.update(obstacle_speed);
        }

        let before = (self.projectiles.len(), self.obstacles.len());
        self.projectiles
            .retain(|p| !p.is_out_of_bounds(config.projectile));
        self.obstacles
            .retain(|o| !o.is_out_of_bounds(config.obstacle, config.play_height));

        let pruned = (
            before.0 - self.projectiles.len(),
            before.1 - self.obstacles.len(),
        );
        if pruned != (0, 0) {
            debug!(
                "Pruned {} projectiles and {} obstacles off screen",
                pruned.0, pruned.1
            );
        }
    }

    /// Remove both sides of every hit in one pass
    pub fn remove_hits(&mut self, hits: &[Hit]) {
        if hits.is_empty() {
            return;
        }
        let projectiles: HashSet<EntityId> = hits.iter().map(|h| h.projectile).collect();
        let obstacles: HashSet<EntityId> = hits.iter().map(|h| h.obstacle).collect();

        self.projectiles.retain(|p| !projectiles.contains(&p.id));
        self.obstacles.retain(|o| !obstacles.contains(&o.id));
    }

    pub fn remove_obstacle(&mut self, id: EntityId) {
        self.obstacles.retain(|o| o.id != id);
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.obstacles.clear();
    }
}
