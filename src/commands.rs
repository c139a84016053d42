use std::sync::mpsc::{self, Receiver, Sender};

use crate::sensor::TiltSample;

/// The only two inputs the game core accepts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Tap/click/space: start or restart a session, or fire while running
    Activate,
    /// One tilt reading from the sensor
    Tilt(TiltSample),
}

/// Cloneable sending half. `Send`, so sources on other threads can feed the loop.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queue a command. Returns false once the game loop has been dropped.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Receiving half, owned by the game loop
#[derive(Debug)]
pub struct CommandQueue {
    rx: Receiver<Command>,
}

impl CommandQueue {
    pub fn channel() -> (CommandSender, CommandQueue) {
        let (tx, rx) = mpsc::channel();
        (CommandSender { tx }, CommandQueue { rx })
    }

    /// Everything queued so far, in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}
