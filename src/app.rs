use color_eyre::Result;
use log::info;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::audio::SoundBoard;
use crate::commands::{Command, CommandQueue, CommandSender};
use crate::config::GameConfig;
use crate::highscore::HighScoreBook;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::sensor::{KeyboardTilt, SensorFeed};
use crate::session::{Game, GameEvent, Phase};
use crate::spawner::Spawner;
use crate::ticker::FixedTicker;

/// The main application: owns the game and every collaborator around it.
pub struct App {
    running: bool,
    game: Game,
    commands: CommandSender,
    ticker: FixedTicker,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    sensor: SensorFeed<KeyboardTilt>,
    renderer: GameRenderer,
    sound: SoundBoard,
    high_scores: HighScoreBook,
}

impl App {
    /// Wire the game to its collaborators
    pub fn new(
        config: GameConfig,
        high_scores: HighScoreBook,
        sound: SoundBoard,
        key_release_events: bool,
    ) -> Self {
        let (commands, queue) = CommandQueue::channel();
        let ticker = FixedTicker::new(config.tick_interval(), config.max_ticks_per_frame);
        let sensor = SensorFeed::connect(
            KeyboardTilt::new(config.keyboard_tilt, key_release_events)
                .with_hold_timeout(config.key_hold_timeout()),
            config.sensor_interval(),
        );
        let game = Game::new(config, high_scores.best(), queue, Spawner::from_entropy());

        Self {
            running: true,
            game,
            commands,
            ticker,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            sensor,
            renderer: GameRenderer::new(),
            sound,
            high_scores,
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let result = self.run_loop(terminal);
        self.shutdown();
        result
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            self.input_manager.poll_events()?;
            let actions = self.input_manager.take_actions();
            self.process_actions(&actions, now);

            if let Some(sample) = self.sensor.poll(now) {
                self.commands.send(Command::Tilt(sample));
            }

            self.update(now);

            let snapshot = self.game.snapshot();
            let config = self.game.config();
            let renderer = &self.renderer;
            let fps = self.fps;
            terminal.draw(|frame| {
                let view = RenderView {
                    snapshot: &snapshot,
                    config,
                    area: frame.area(),
                    fps,
                };
                renderer.render(frame, &view);
            })?;

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    /// Route input actions: taps go through the command queue, steering to the sensor
    fn process_actions(&mut self, actions: &[InputAction], now: Instant) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Activate => {
                    self.commands.send(Command::Activate);
                }
                InputAction::SteerPress(direction) => {
                    if let Some(sensor) = self.sensor.sensor_mut() {
                        sensor.press(*direction, now);
                    }
                }
                InputAction::SteerRelease(direction) => {
                    if let Some(sensor) = self.sensor.sensor_mut() {
                        sensor.release(*direction);
                    }
                }
            }
        }
    }

    /// Apply queued commands, then run every tick that is due
    fn update(&mut self, now: Instant) {
        let events = self.game.pump();
        self.handle_events(&events);

        if self.game.phase() == Phase::Running && !self.ticker.is_running() {
            self.ticker.start(now);
        }

        for _ in 0..self.ticker.due(now) {
            let events = self.game.tick();
            self.handle_events(&events);
            if !self.ticker.is_running() {
                break;
            }
        }
    }

    /// Side effects run after the tick that produced them
    fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Hit(_) => self.sound.play_blast(),
                GameEvent::GameOver { .. } => self.ticker.stop(),
                GameEvent::NewHighScore(score) => {
                    self.high_scores.submit(*score);
                }
                GameEvent::Started | GameEvent::Fired(_) | GameEvent::Spawned(_) => {}
            }
        }
    }

    /// Stop the tick timer and release the sensor and sounds
    fn shutdown(&mut self) {
        self.ticker.stop();
        self.sensor.release();
        self.sound.release();
        info!("Shut down with high score {}", self.high_scores.best());
    }
}
