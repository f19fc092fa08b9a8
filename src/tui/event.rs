//! Event handling for the explorer.

use crossterm::event::{KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that drive the explorer loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed
    Key(KeyEvent),
    /// Redraw and poll running batches
    Tick,
}

/// What the reader task does with one item of the terminal stream
#[derive(Debug)]
enum Input {
    Forward(Event),
    Ignore,
    Stop,
}

fn classify(item: Option<io::Result<crossterm::event::Event>>) -> Input {
    match item {
        Some(Ok(crossterm::event::Event::Key(key))) if key.kind == KeyEventKind::Press => {
            Input::Forward(Event::Key(key))
        }
        // Releases, repeats, mouse and resize events
        Some(Ok(_)) => Input::Ignore,
        Some(Err(e)) => {
            tracing::warn!("Terminal event stream failed, stopping input: {}", e);
            Input::Stop
        }
        None => Input::Stop,
    }
}

/// Merges terminal input and the tick interval into one channel.
///
/// The channel closes when the reader task stops, which ends the explorer loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (event_tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                let crossterm_event = reader.next().fuse();
                let tick = interval.tick();

                tokio::select! {
                    maybe_event = crossterm_event => {
                        match classify(maybe_event) {
                            Input::Forward(event) => {
                                if event_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Input::Ignore => {}
                            Input::Stop => break,
                        }
                    }
                    _ = tick => {
                        if event_tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(kind: KeyEventKind) -> crossterm::event::Event {
        crossterm::event::Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            kind,
        ))
    }

    #[test]
    fn test_key_presses_are_forwarded() {
        assert!(matches!(
            classify(Some(Ok(key(KeyEventKind::Press)))),
            Input::Forward(Event::Key(_))
        ));
        assert!(matches!(
            classify(Some(Ok(key(KeyEventKind::Release)))),
            Input::Ignore
        ));
        assert!(matches!(
            classify(Some(Ok(crossterm::event::Event::Resize(80, 24)))),
            Input::Ignore
        ));
    }

    #[test]
    fn test_stream_error_stops_reader() {
        let err = io::Error::new(io::ErrorKind::Other, "tty gone");
        assert!(matches!(classify(Some(Err(err))), Input::Stop));
        assert!(matches!(classify(None), Input::Stop));
    }
}
