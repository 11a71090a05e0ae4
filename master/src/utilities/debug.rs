use std::io::{stdout, Stdout, Write};

use crossbeam_channel::{select, Receiver};
use crossterm::{cursor, queue, style::Print, terminal, Result};

use crate::utilities::elevator_status::ElevatorStatus;
use crate::utilities::lcd::{LcdLines, LCD_COLUMNS};

const STATUS_SIZE: u16 = 19;

/// Status panel on the master terminal. The terminal is in raw mode, so
/// every line ends with an explicit move to the next line.
pub struct Debug {
    stdout: Stdout,
    drawn: bool,
}

impl Debug {
    pub fn new() -> Self {
        Debug {
            stdout: stdout(),
            drawn: false,
        }
    }

    fn line(&mut self, text: String) -> Result<()> {
        queue!(self.stdout, Print(text), cursor::MoveToNextLine(1))
    }

    pub fn printstatus(&mut self, lcd: &LcdLines, status: Option<&ElevatorStatus>) -> Result<()> {
        if self.drawn {
            queue!(self.stdout, cursor::MoveUp(STATUS_SIZE))?;
        }
        queue!(self.stdout, cursor::MoveToColumn(0), terminal::Clear(terminal::ClearType::FromCursorDown))?;

        let width = LCD_COLUMNS;
        self.line(format!("+-{0:-<width$}-+", ""))?;
        self.line(format!("| {0:<width$} |", lcd.line1))?;
        self.line(format!("| {0:<width$} |", lcd.line2))?;
        self.line(format!("+-{0:-<width$}-+", ""))?;
        self.line(String::new())?;

        let (state, floor, selected, door, bus) = match status {
            Some(status) => (
                status.state.as_string(),
                status.current_floor.to_string(),
                status.selected_floor.to_string(),
                status.door.as_string(),
                if status.transport_fault { String::from("fault") } else { String::from("ok") },
            ),
            None => (String::from("-"), String::from("-"), String::from("-"), String::from("-"), String::from("-")),
        };

        self.line(String::from("+-------------------------+"))?;
        self.line(String::from("| STATE MACHINE           |"))?;
        self.line(String::from("+------------+------------+"))?;
        for (label, value) in [("STATE", state), ("FLOOR", floor), ("SELECTED", selected), ("DOOR", door), ("BUS", bus)] {
            self.line(format!("| {0:<10} | {1:<10} |", label, value))?;
            self.line(String::from("+------------+------------+"))?;
        }
        self.line(String::from("keys: 0-9 A-D * #   e: emergency   q: quit"))?;

        self.stdout.flush()?;
        self.drawn = true;
        Ok(())
    }
}

pub fn main(display_rx: Receiver<LcdLines>, elevator_status_rx: Receiver<ElevatorStatus>) -> Result<()> {
    let mut debug = Debug::new();

    let mut lcd = LcdLines::new("Ready", "");
    let mut status: Option<ElevatorStatus> = None;
    debug.printstatus(&lcd, status.as_ref())?;

    loop {
        select! {
            recv(display_rx) -> msg => match msg {
                Ok(lines) => lcd = lines,
                Err(_) => return Ok(()),
            },
            recv(elevator_status_rx) -> msg => match msg {
                Ok(snapshot) => status = Some(snapshot),
                Err(_) => return Ok(()),
            },
        }
        debug.printstatus(&lcd, status.as_ref())?;
    }
}
