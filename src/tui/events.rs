use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Bracketed paste; Arabic input methods often deliver text this way.
    Paste(String),
    Resize,
    Tick,
}

fn translate(ev: CEvent) -> Option<Event> {
    match ev {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CEvent::Paste(text) => Some(Event::Paste(text)),
        CEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                if event::poll(timeout).unwrap_or(false) {
                    let Ok(raw) = event::read() else {
                        break;
                    };
                    if let Some(ev) = translate(raw) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn only_key_presses_are_forwarded() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(translate(CEvent::Key(press)), Some(Event::Key(_))));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(translate(CEvent::Key(release)).is_none());
        assert!(translate(CEvent::FocusGained).is_none());
    }

    #[test]
    fn paste_and_resize_pass_through() {
        assert!(matches!(
            translate(CEvent::Paste("جامع".into())),
            Some(Event::Paste(t)) if t == "جامع"
        ));
        assert!(matches!(translate(CEvent::Resize(80, 24)), Some(Event::Resize)));
    }
}
