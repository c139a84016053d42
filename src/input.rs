use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

use crate::sensor::Steer;

/// Represents semantic actions that raw terminal input maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Tap: start, restart or fire depending on the session
    Activate,
    /// A steering key went down (or repeated)
    SteerPress(Steer),
    /// A steering key came up
    SteerRelease(Steer),
    Quit,
}

/// Polls crossterm and translates raw key and mouse events into game actions
#[derive(Debug, Default)]
pub struct InputManager {
    actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Polls all pending events without blocking.
    /// Should be called once per frame before taking actions.
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            self.handle_event(event);
        }
        Ok(())
    }

    /// Actions gathered since the last call, in arrival order
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Mouse(mouse) => {
                // A click is the terminal's tap
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    self.actions.push(InputAction::Activate);
                }
            }
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            if key_event.kind == KeyEventKind::Press {
                self.actions.push(InputAction::Quit);
            }
            return;
        }

        let steer = match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Steer::Left),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Steer::Right),
            _ => None,
        };

        if let Some(direction) = steer {
            match key_event.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    self.actions.push(InputAction::SteerPress(direction));
                }
                KeyEventKind::Release => {
                    self.actions.push(InputAction::SteerRelease(direction));
                }
            }
            return;
        }

        // Held space must not autofire: only the initial press counts
        if key_event.kind == KeyEventKind::Press
            && matches!(key_event.code, KeyCode::Char(' ') | KeyCode::Enter)
        {
            self.actions.push(InputAction::Activate);
        }
    }
}
