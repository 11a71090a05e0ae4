/// ----- IO MODULE -----
/// The terminal stands in for the keypad and the emergency button. Keys are
/// read in raw mode on their own thread and forwarded to the controller.

use std::io;
use std::process;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(char),
    Emergency,
    Quit,
}

/// Keypad layout is 0-9, A-D, * and #.
pub fn decode_key(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char('e') => Some(Input::Emergency),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '*' || c == '#' => Some(Input::Key(c)),
        KeyCode::Char(c) if ('a'..='d').contains(&c.to_ascii_lowercase()) => Some(Input::Key(c.to_ascii_uppercase())),
        _ => None,
    }
}

pub fn init(poll_period: Duration) -> io::Result<(Receiver<char>, Receiver<bool>)> {
    let (keypad_tx, keypad_rx) = unbounded();
    let (emergency_tx, emergency_rx) = unbounded();

    terminal::enable_raw_mode()?;
    thread::Builder::new().name("keypad".to_string()).spawn(move || scan(keypad_tx, emergency_tx, poll_period))?;

    Ok((keypad_rx, emergency_rx))
}

fn scan(keypad_tx: Sender<char>, emergency_tx: Sender<bool>, poll_period: Duration) {
    loop {
        // no event within the poll period means no key is down
        match event::poll(poll_period) {
            Ok(false) => continue,
            Ok(true) => (),
            Err(e) => {
                warn!("Failed to poll terminal: {}", e);
                continue;
            },
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
            Ok(_) => continue,
            Err(e) => {
                warn!("Failed to read terminal: {}", e);
                continue;
            },
        };

        match decode_key(key) {
            Some(Input::Key(c)) => { let _ = keypad_tx.send(c); },
            Some(Input::Emergency) => { let _ = emergency_tx.send(true); },
            Some(Input::Quit) => quit(),
            None => (),
        }
    }
}

pub fn restore_terminal() {
    if let Err(e) = terminal::disable_raw_mode() {
        warn!("Failed to restore terminal: {}", e);
    }
}

fn quit() {
    restore_terminal();
    info!("Shutting down");
    println!();
    process::exit(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keypad_keys_are_forwarded() {
        for c in "0123456789*#ABCD".chars() {
            assert_eq!(decode_key(key(KeyCode::Char(c))), Some(Input::Key(c)));
        }
        assert_eq!(decode_key(key(KeyCode::Char('b'))), Some(Input::Key('B')));
    }

    #[test]
    fn control_keys() {
        assert_eq!(decode_key(key(KeyCode::Char('e'))), Some(Input::Emergency));
        assert_eq!(decode_key(key(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(decode_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Input::Quit));
        assert_eq!(decode_key(key(KeyCode::Char('c'))), Some(Input::Key('C')));
        assert_eq!(decode_key(key(KeyCode::Char('x'))), None);
        assert_eq!(decode_key(key(KeyCode::Enter)), None);
    }
}
