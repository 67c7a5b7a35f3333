//! Event handling for TUI.
//!
//! Uses a separate thread to poll for terminal events and timer ticks.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tracing::warn;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer tick; drives the filter debounce.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width, height).
    Resize(u16, u16),
}

/// Event handler that polls for terminal events in a separate thread.
///
/// The channel closes when the polling thread stops, so `next()` then
/// returns an error instead of blocking.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || poll_loop(&tx, tick_rate, read_terminal));
        Self { rx }
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Waits up to `timeout` for a terminal event.
fn read_terminal(timeout: Duration) -> io::Result<Option<CrosstermEvent>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Forwards events from `poll` to `tx`, sending a tick whenever `poll`
/// times out. Stops when the receiver is gone or `poll` fails.
fn poll_loop<F>(tx: &Sender<Event>, tick_rate: Duration, mut poll: F)
where
    F: FnMut(Duration) -> io::Result<Option<CrosstermEvent>>,
{
    loop {
        let event = match poll(tick_rate) {
            // Windows reports both press and release.
            Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                Event::Key(key)
            }
            Ok(Some(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
            Ok(Some(_)) => continue,
            Ok(None) => Event::Tick,
            Err(e) => {
                warn!(error = %e, "terminal poll failed");
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}
