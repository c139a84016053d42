/// Integration tests for the game loop
///
/// These drive a full `Game` through its command queue and tick, the way the
/// app does, and check the session-level rules: movement, spawning, hits,
/// game over, restart and the high score.
use tilt_cannon::highscore::{HighScoreBook, KeyValueStore, MemoryStore};
use tilt_cannon::sensor::TiltSample;
use tilt_cannon::{
    Command, CommandQueue, CommandSender, EndCause, Game, GameConfig, GameEvent, Phase, Spawner,
};

fn new_game(config: GameConfig, high_score: u32) -> (Game, CommandSender) {
    let (tx, queue) = CommandQueue::channel();
    (Game::new(config, high_score, queue, Spawner::new(42)), tx)
}

fn started_game(config: GameConfig) -> (Game, CommandSender) {
    let (mut game, tx) = new_game(config, 0);
    tx.send(Command::Activate);
    assert_eq!(game.pump(), vec![GameEvent::Started]);
    (game, tx)
}

fn count_spawns(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Spawned(_)))
        .count()
}

#[test]
fn test_one_obstacle_every_fourteen_ticks() {
    let (mut game, _tx) = started_game(GameConfig::default());

    for tick in 1..=140u32 {
        let events = game.tick();
        let expected = usize::from(tick % 14 == 0);
        assert_eq!(count_spawns(&events), expected, "tick {}", tick);
        if game.phase() != Phase::Running {
            break;
        }
    }
}

#[test]
fn test_entities_move_monotonically_until_removed() {
    let (mut game, tx) = started_game(GameConfig::default());

    let mut last_projectiles = Vec::new();
    let mut last_obstacles = Vec::new();

    for tick in 0..200 {
        if tick % 5 == 0 {
            tx.send(Command::Activate);
        }
        game.step();
        if game.phase() != Phase::Running {
            break;
        }

        for p in game.store().projectiles() {
            if let Some((_, y)) = last_projectiles.iter().find(|(id, _)| *id == p.id) {
                assert!(p.y <= *y);
            }
        }
        for o in game.store().obstacles() {
            if let Some((_, y)) = last_obstacles.iter().find(|(id, _)| *id == o.id) {
                assert!(o.y >= *y);
            }
        }

        last_projectiles = game
            .store()
            .projectiles()
            .iter()
            .map(|p| (p.id, p.y))
            .collect();
        last_obstacles = game
            .store()
            .obstacles()
            .iter()
            .map(|o| (o.id, o.y))
            .collect();
    }
}

#[test]
fn test_unattended_game_ends_at_the_floor() {
    let (mut game, _tx) = started_game(GameConfig::default());

    let mut over = None;
    for _ in 0..2000 {
        for event in game.tick() {
            if let GameEvent::GameOver { score, cause } = event {
                over = Some((score, cause));
            }
        }
        if game.phase() == Phase::Over {
            break;
        }
    }

    let (score, cause) = over.expect("an obstacle should eventually land");
    assert_eq!(score, 0);
    assert!(matches!(cause, EndCause::Floor | EndCause::Cannon));
    // Over is terminal: further ticks do nothing
    let before = game.snapshot();
    for _ in 0..50 {
        assert!(game.tick().is_empty());
    }
    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_shooting_the_first_obstacle_scores_ten() {
    // A narrow play area the width of one obstacle: the spawn column is fixed
    let config = GameConfig {
        play_width: 60.0,
        ..GameConfig::default()
    };
    let (mut game, tx) = started_game(config);

    // Wait for the first spawn, then fire straight up at it
    for _ in 0..14 {
        game.tick();
    }
    assert_eq!(game.store().obstacles().len(), 1);
    let target = game.store().obstacles()[0].id;
    tx.send(Command::Activate);
    game.pump();

    let mut hits = Vec::new();
    for _ in 0..60 {
        for event in game.tick() {
            if let GameEvent::Hit(hit) = event {
                hits.push(hit);
            }
        }
        if !hits.is_empty() {
            break;
        }
    }

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].obstacle, target);
    assert_eq!(game.score(), 10);
    assert!(game.store().projectiles().is_empty());
    // Later spawns are still falling; only the target is gone
    assert!(game.store().obstacles().iter().all(|o| o.id != target));
    assert_eq!(game.phase(), Phase::Running);
}

#[test]
fn test_volley_into_one_obstacle_scores_every_shot() {
    let config = GameConfig {
        play_width: 60.0,
        ..GameConfig::default()
    };
    let (mut game, tx) = started_game(config);

    for _ in 0..14 {
        game.tick();
    }
    let target = game.store().obstacles()[0].id;
    // Two taps in one frame: both shots share a column
    tx.send(Command::Activate);
    tx.send(Command::Activate);
    game.pump();
    assert_eq!(game.store().projectiles().len(), 2);

    let mut hits = Vec::new();
    for _ in 0..60 {
        for event in game.tick() {
            if let GameEvent::Hit(hit) = event {
                hits.push(hit);
            }
        }
        if !hits.is_empty() {
            break;
        }
    }

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|hit| hit.obstacle == target));
    assert_eq!(game.score(), 20);
    assert!(game.store().projectiles().is_empty());
    assert!(game.store().obstacles().iter().all(|o| o.id != target));
}

#[test]
fn test_restart_always_resets() {
    let (mut game, tx) = started_game(GameConfig::default());
    tx.send(Command::Tilt(TiltSample::new(0.0, 3.0, 0.0)));
    tx.send(Command::Activate);
    game.pump();
    while game.phase() == Phase::Running {
        game.tick();
    }

    tx.send(Command::Activate);
    game.pump();

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase, Phase::Running);
    assert_eq!(snapshot.score, 0);
    assert!(snapshot.projectiles.is_empty());
    assert!(snapshot.obstacles.is_empty());
    assert_eq!(snapshot.cannon_x, 150.0);
}

#[test]
fn test_cannon_clamped_under_any_tilt() {
    let config = GameConfig::default();
    let max_x = config.cannon_max_x();
    let (mut game, tx) = started_game(config);

    for magnitude in [0.5f32, 5.0, 500.0, 1.0e9] {
        for _ in 0..40 {
            tx.send(Command::Tilt(TiltSample::new(0.0, magnitude, 0.0)));
        }
        game.pump();
        assert_eq!(game.cannon().x, max_x);

        for _ in 0..40 {
            tx.send(Command::Tilt(TiltSample::new(0.0, -magnitude, 0.0)));
        }
        game.pump();
        assert_eq!(game.cannon().x, 0.0);
    }
}

#[test]
fn test_new_high_score_reaches_the_store() {
    let mut store = MemoryStore::new();
    store.set("highScore", "0").unwrap();
    let mut book = HighScoreBook::load(Box::new(store), "highScore");

    let config = GameConfig {
        play_width: 60.0,
        ..GameConfig::default()
    };
    let (tx, queue) = CommandQueue::channel();
    let mut game = Game::new(config, book.best(), queue, Spawner::new(3));
    tx.send(Command::Activate);
    game.pump();

    let mut events = Vec::new();
    for tick in 0..3000 {
        // Fire once, at the first obstacle, then let the next one land
        if tick == 14 {
            tx.send(Command::Activate);
        }
        events.extend(game.step());
        if game.phase() == Phase::Over {
            break;
        }
    }

    for event in &events {
        if let GameEvent::NewHighScore(score) = event {
            assert!(book.submit(*score));
        }
    }
    assert_eq!(book.best(), 10);
    assert_eq!(game.high_score(), 10);

    // Same score again is not a new high
    assert!(!book.submit(10));
}

#[test]
fn test_ids_unique_across_sessions() {
    let (mut game, tx) = started_game(GameConfig::default());
    let mut seen = std::collections::HashSet::new();

    for _ in 0..3 {
        for tick in 0..300 {
            if tick % 7 == 0 {
                tx.send(Command::Activate);
            }
            for event in game.step() {
                match event {
                    GameEvent::Fired(id) | GameEvent::Spawned(id) => {
                        assert!(seen.insert(id), "id {} reused", id);
                    }
                    _ => {}
                }
            }
            if game.phase() == Phase::Over {
                break;
            }
        }
        tx.send(Command::Activate);
        game.pump();
    }
}
