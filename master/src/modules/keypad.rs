/// ----- KEYPAD MODULE -----
/// Reads a floor number from the keypad. At most two digits are kept; a
/// third digit starts the entry over, and '#' confirms.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvError, Sender};
use log::debug;

use crate::utilities::floor::Floor;
use crate::utilities::lcd::LcdLines;

pub const CONFIRM_KEY: char = '#';
const MAX_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Accepted,
    Reset,
    Confirmed(Floor),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct FloorEntry {
    buffer: String,
    digits: usize,
}

impl FloorEntry {
    pub fn new() -> Self {
        FloorEntry {
            buffer: String::new(),
            digits: 0,
        }
    }

    pub fn press(&mut self, key: char) -> Entry {
        match key {
            '0'..='9' if self.digits < MAX_DIGITS => {
                if self.digits == 0 {
                    self.buffer.clear();
                }
                self.buffer.push(key);
                self.digits += 1;
                Entry::Accepted
            },
            '0'..='9' => {
                self.buffer = String::from("0");
                self.digits = 0;
                Entry::Reset
            },
            CONFIRM_KEY => Entry::Confirmed(self.value()),
            _ => Entry::Ignored,
        }
    }

    /// What the display shows under "Choose floor".
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Floor 0 when no digit has been entered.
    pub fn value(&self) -> Floor {
        let value = self.buffer
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0u8, |value, digit| value * 10 + digit as u8);
        Floor::saturating(value)
    }
}

pub fn read_floor(keypad_rx: &Receiver<char>, display_tx: &Sender<LcdLines>, debounce: Duration) -> Result<Floor, RecvError> {
    let mut entry = FloorEntry::new();
    loop {
        let key = keypad_rx.recv()?;
        match entry.press(key) {
            Entry::Confirmed(floor) => return Ok(floor),
            Entry::Ignored => (),
            accepted => {
                if accepted == Entry::Reset {
                    debug!("Too many digits, starting over");
                }
                let _ = display_tx.send(LcdLines::new("Choose floor", entry.text()));
                thread::sleep(debounce);
            },
        }
    }
}

/// Blocks until any key is pressed.
pub fn wait_for_acknowledge(keypad_rx: &Receiver<char>) -> Result<char, RecvError> {
    keypad_rx.recv()
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    fn enter(keys: &str) -> Floor {
        let mut entry = FloorEntry::new();
        for key in keys.chars() {
            if let Entry::Confirmed(floor) = entry.press(key) {
                return floor;
            }
        }
        panic!("{} was never confirmed", keys);
    }

    #[test]
    fn every_floor_can_be_entered() {
        for floor in 0..=Floor::MAX {
            assert_eq!(enter(&format!("{}#", floor)).value(), floor);
            assert_eq!(enter(&format!("{:02}#", floor)).value(), floor);
        }
    }

    #[test]
    fn confirm_without_digits_is_ground_floor() {
        assert_eq!(enter("#").value(), 0);
    }

    #[test]
    fn third_digit_starts_over() {
        let mut entry = FloorEntry::new();
        assert_eq!(entry.press('1'), Entry::Accepted);
        assert_eq!(entry.press('2'), Entry::Accepted);
        assert_eq!(entry.text(), "12");
        assert_eq!(entry.press('3'), Entry::Reset);
        assert_eq!(entry.text(), "0");
        assert_eq!(entry.press('4'), Entry::Accepted);
        assert_eq!(entry.text(), "4");

        assert_eq!(enter("123#").value(), 0);
        assert_eq!(enter("1234#").value(), 4);
        assert_eq!(enter("12345#").value(), 45);
    }

    #[test]
    fn letters_and_star_are_ignored() {
        assert_eq!(enter("A*5B#").value(), 5);
    }

    #[test]
    fn read_floor_echoes_accepted_digits() {
        let (keypad_tx, keypad_rx) = unbounded();
        let (display_tx, display_rx) = unbounded();
        for key in "4C2#".chars() {
            keypad_tx.send(key).unwrap();
        }

        let floor = read_floor(&keypad_rx, &display_tx, Duration::ZERO).unwrap();
        assert_eq!(floor.value(), 42);
        let shown: Vec<String> = display_rx.try_iter().map(|lcd| lcd.line2).collect();
        assert_eq!(shown, vec!["4", "42"]);
    }

    #[test]
    fn closed_keypad_is_an_error() {
        let (keypad_tx, keypad_rx) = unbounded::<char>();
        let (display_tx, _display_rx) = unbounded();
        keypad_tx.send('7').unwrap();
        drop(keypad_tx);
        assert!(read_floor(&keypad_rx, &display_tx, Duration::ZERO).is_err());
    }
}
