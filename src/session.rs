use log::{debug, info};

use crate::collision::{self, EndCause, Hit};
use crate::commands::{Command, CommandQueue};
use crate::config::GameConfig;
use crate::entities::{Cannon, EntityId};
use crate::snapshot::{Position, Snapshot};
use crate::spawner::Spawner;
use crate::store::EntityStore;

/// Session state machine: Idle -> Running -> Over -> Running ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first activate
    Idle,
    Running,
    /// Terminal until the next activate
    Over,
}

/// Side effects for the app to carry out after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Fired(EntityId),
    Spawned(EntityId),
    Hit(Hit),
    GameOver { score: u32, cause: EndCause },
    /// Score beat the best known score and should be persisted
    NewHighScore(u32),
}

pub struct Game {
    config: GameConfig,
    phase: Phase,
    score: u32,
    high_score: u32,
    cannon: Cannon,
    store: EntityStore,
    spawner: Spawner,
    commands: CommandQueue,
}

impl Game {
    pub fn new(config: GameConfig, high_score: u32, commands: CommandQueue, spawner: Spawner) -> Self {
        let cannon = Cannon::centered(&config);
        Self {
            config,
            phase: Phase::Idle,
            score: 0,
            high_score,
            cannon,
            store: EntityStore::new(),
            spawner,
            commands,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn cannon(&self) -> &Cannon {
        &self.cannon
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Apply every queued command, in arrival order
    pub fn pump(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for command in self.commands.drain() {
            self.apply(command, &mut events);
        }
        events
    }

    /// Drain commands, then run one tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = self.pump();
        events.extend(self.tick());
        events
    }

    pub fn apply(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        match command {
            Command::Activate => match self.phase {
                Phase::Idle | Phase::Over => {
                    self.start();
                    events.push(GameEvent::Started);
                }
                Phase::Running => {
                    let (x, y) = self.cannon.muzzle(&self.config);
                    let id = self.store.fire(x, y);
                    events.push(GameEvent::Fired(id));
                }
            },
            Command::Tilt(sample) => {
                if self.phase == Phase::Running {
                    self.cannon.tilt(sample.y, &self.config);
                }
            }
        }
    }

    fn start(&mut self) {
        self.phase = Phase::Running;
        self.score = 0;
        self.store.clear();
        self.cannon.recenter(&self.config);
        self.spawner.reset();
        info!("Session started (high score {})", self.high_score);
    }

    /// Advance one fixed step. A no-op outside `Running`.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }

        if let Some((x, y)) = self.spawner.tick(&self.config) {
            let id = self.store.spawn_obstacle(x, y);
            debug!("Spawned obstacle {} at x={:.1}", id, x);
            events.push(GameEvent::Spawned(id));
        }

        let speed = self.config.obstacle_speed(self.score);
        self.store.advance(speed, &self.config);

        let hits = collision::find_hits(self.store.projectiles(), self.store.obstacles(), &self.config);
        for hit in &hits {
            self.score += self.config.hit_reward;
            debug!("Projectile {} hit obstacle {}", hit.projectile, hit.obstacle);
            events.push(GameEvent::Hit(*hit));
        }
        self.store.remove_hits(&hits);

        if let Some((obstacle, cause)) =
            collision::check_game_over(self.store.obstacles(), &self.cannon, &self.config)
        {
            self.store.remove_obstacle(obstacle);
            self.end(cause, &mut events);
        }

        events
    }

    fn end(&mut self, cause: EndCause, events: &mut Vec<GameEvent>) {
        self.phase = Phase::Over;
        info!("Game over ({:?}) with score {}", cause, self.score);
        events.push(GameEvent::GameOver {
            score: self.score,
            cause,
        });

        if self.score > self.high_score {
            self.high_score = self.score;
            events.push(GameEvent::NewHighScore(self.score));
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            cannon_x: self.cannon.x,
            projectiles: self
                .store
                .projectiles()
                .iter()
                .map(|p| Position {
                    id: p.id,
                    x: p.x,
                    y: p.y,
                })
                .collect(),
            obstacles: self
                .store
                .obstacles()
                .iter()
                .map(|o| Position {
                    id: o.id,
                    x: o.x,
                    y: o.y,
                })
                .collect(),
            play_width: self.config.play_width,
            play_height: self.config.play_height,
        }
    }
}
