use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;

use tilt_cannon::app::App;
use tilt_cannon::audio::SoundBoard;
use tilt_cannon::config::{GameConfig, RuntimeConfig};
use tilt_cannon::highscore::{HighScoreBook, JsonFileStore};

fn main() -> Result<()> {
    color_eyre::install()?;

    let runtime = RuntimeConfig::from_env();
    init_logging(&runtime)?;

    let config = GameConfig::load(runtime.config_path.as_deref())
        .wrap_err("Failed to load game configuration")?;
    info!(
        "Play area {}x{}, tick {} ms",
        config.play_width, config.play_height, config.tick_interval_ms
    );

    let high_scores = HighScoreBook::load(
        Box::new(JsonFileStore::new(&runtime.save_path)),
        &config.high_score_key,
    );
    let sound = SoundBoard::open_default(config.blast_volume, &runtime.sound_path);

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!("Keyboard enhancement supported: {}", supports_keyboard_enhancement);

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config, high_scores, sound, supports_keyboard_enhancement);
    let result = app.run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// The terminal belongs to the game screen, so logs go to a file
fn init_logging(runtime: &RuntimeConfig) -> Result<()> {
    let file = File::create(&runtime.log_path)
        .wrap_err_with(|| format!("Failed to create log file {}", runtime.log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
