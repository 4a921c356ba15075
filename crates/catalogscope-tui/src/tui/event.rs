use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Terminal tick (picks up filter changes made outside the selector)
    Tick,
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Error reading from the terminal
    Error(String),
}

/// Event handler reading terminal input on a background task
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(Self::run(sender, cancel.clone(), tick_rate));

        Self { receiver, cancel }
    }

    async fn run(
        sender: mpsc::UnboundedSender<Event>,
        cancel: CancellationToken,
        tick_rate: Duration,
    ) {
        let mut reader = event::EventStream::new();
        let mut tick_interval = tokio::time::interval(tick_rate);

        loop {
            let tick = tick_interval.tick();
            let crossterm_event = reader.next().fuse();

            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick => Event::Tick,
                maybe_event = crossterm_event => match maybe_event {
                    // Filter out release events (important for Windows)
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => Event::Error(e.to_string()),
                    None => break,
                },
            };

            if sender.send(event).is_err() {
                break;
            }
        }

        tracing::debug!("Terminal event reader stopped");
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Shutdown the event handler
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
