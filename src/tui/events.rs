//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Default polling interval for terminal events.
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (redraws the busy indicator).
    Tick,
}

impl Event {
    /// Converts a crossterm event, dropping key releases and repeats.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
            _ => None,
        }
    }
}

/// Blocks for up to `tick_rate` waiting for a terminal event.
///
/// Returns `Event::Tick` when nothing arrived. Meant to run on a blocking
/// thread.
pub fn poll(tick_rate: Duration) -> Event {
    if event::poll(tick_rate).unwrap_or(false) {
        event::read()
            .ok()
            .and_then(Event::from_crossterm)
            .unwrap_or(Event::Tick)
    } else {
        Event::Tick
    }
}

/// Starts the terminal input thread.
///
/// Every polled event, ticks included, is forwarded in order. The thread
/// exits once the receiver is dropped.
pub fn spawn_reader(tx: mpsc::Sender<Event>) -> thread::JoinHandle<()> {
    spawn_reader_with(tx, || poll(TICK_RATE))
}

/// Starts an input thread fed by `next_event`.
pub fn spawn_reader_with<F>(tx: mpsc::Sender<Event>, mut next_event: F) -> thread::JoinHandle<()>
where
    F: FnMut() -> Event + Send + 'static,
{
    thread::spawn(move || loop {
        if tx.blocking_send(next_event()).is_err() {
            debug!("Input reader stopped");
            break;
        }
    })
}
