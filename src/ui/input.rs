use console::{Key, Term};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use crate::core::{ItemKind, Offering, Stage};

/// A key press translated into something a stage understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Quit,
    TogglePause,
    ReleaseKite,
    SelectKind(ItemKind),
    Offer(Offering),
    Beat,
    Grab,
    Delete,
    Refresh,
}

/// Maps a key to an input for the stage on screen.
pub fn map_key(stage: Stage, key: &Key) -> Option<InputEvent> {
    let common = match key {
        Key::ArrowUp => Some(InputEvent::Up),
        Key::ArrowDown => Some(InputEvent::Down),
        Key::ArrowLeft => Some(InputEvent::Left),
        Key::ArrowRight => Some(InputEvent::Right),
        Key::Enter => Some(InputEvent::Confirm),
        Key::Escape | Key::Char('q') => Some(InputEvent::Quit),
        _ => None,
    };
    if common.is_some() {
        return common;
    }

    let Key::Char(ch) = key else {
        return match (stage, key) {
            (Stage::Village, Key::Backspace | Key::Del) => Some(InputEvent::Delete),
            _ => None,
        };
    };

    match (stage, *ch) {
        (Stage::Story, ' ') => Some(InputEvent::TogglePause),
        (Stage::Story, 'k') => Some(InputEvent::ReleaseKite),
        (Stage::Story, 'h') => Some(InputEvent::Left),
        (Stage::Story, 'l') => Some(InputEvent::Right),
        (Stage::Village, 'h') => Some(InputEvent::Left),
        (Stage::Village, 'j') => Some(InputEvent::Down),
        (Stage::Village, 'k') => Some(InputEvent::Up),
        (Stage::Village, 'l') => Some(InputEvent::Right),
        (Stage::Village, ' ') => Some(InputEvent::Confirm),
        (Stage::Village, '1'..='4') => {
            let index = (*ch as usize) - ('1' as usize);
            ItemKind::ALL.get(index).copied().map(InputEvent::SelectKind)
        }
        (Stage::Village, 'z') => Some(InputEvent::Offer(Offering::Popcorn)),
        (Stage::Village, 'x') => Some(InputEvent::Offer(Offering::Peanuts)),
        (Stage::Village, 'c') => Some(InputEvent::Offer(Offering::Rewari)),
        (Stage::Village, 'b') => Some(InputEvent::Beat),
        (Stage::Village, 'g') => Some(InputEvent::Grab),
        (Stage::Village, 'd') => Some(InputEvent::Delete),
        (Stage::Village, 'r') => Some(InputEvent::Refresh),
        _ => None,
    }
}

/// Reads keys on a plain thread and forwards them to the async loop.
///
/// `Term::read_key` blocks, so the reader lives outside the runtime; it
/// stops on its own once the receiver is dropped and the next key arrives.
pub fn spawn_key_reader(term: Term) -> mpsc::UnboundedReceiver<Key> {
    let (sender, receiver) = mpsc::unbounded_channel();

    let spawned = thread::Builder::new()
        .name("key-reader".to_string())
        .spawn(move || loop {
            match term.read_key() {
                Ok(key) => {
                    if sender.send(key).is_err() {
                        debug!("Key reader stopping");
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read key: {}", e);
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        warn!("Could not start the key reader: {}", e);
    }
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_keys() {
        for stage in [Stage::Intro, Stage::Story, Stage::Village] {
            assert_eq!(map_key(stage, &Key::Enter), Some(InputEvent::Confirm));
            assert_eq!(map_key(stage, &Key::Escape), Some(InputEvent::Quit));
            assert_eq!(map_key(stage, &Key::Char('q')), Some(InputEvent::Quit));
        }
    }

    #[test]
    fn test_story_keys() {
        assert_eq!(map_key(Stage::Story, &Key::Char(' ')), Some(InputEvent::TogglePause));
        assert_eq!(map_key(Stage::Story, &Key::Char('k')), Some(InputEvent::ReleaseKite));
        assert_eq!(map_key(Stage::Story, &Key::Char('b')), None);
    }

    #[test]
    fn test_village_keys() {
        assert_eq!(map_key(Stage::Village, &Key::Char('1')), Some(InputEvent::SelectKind(ItemKind::House)));
        assert_eq!(map_key(Stage::Village, &Key::Char('4')), Some(InputEvent::SelectKind(ItemKind::Rangoli)));
        assert_eq!(map_key(Stage::Village, &Key::Char('5')), None);
        assert_eq!(map_key(Stage::Village, &Key::Char('k')), Some(InputEvent::Up));
        assert_eq!(map_key(Stage::Village, &Key::Char('c')), Some(InputEvent::Offer(Offering::Rewari)));
        assert_eq!(map_key(Stage::Village, &Key::Backspace), Some(InputEvent::Delete));
        assert_eq!(map_key(Stage::Intro, &Key::Char('b')), None);
    }
}
