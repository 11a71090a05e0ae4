use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, terminal, Result, ExecutableCommand};

use super::actuator::{self, Indicators};

const STATUS_SIZE: u16 = 11;

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

    pub fn printstatus(&mut self, indicators: &Indicators) -> Result<()> {
        if self.drawn {
            self.stdout.execute(cursor::MoveUp(STATUS_SIZE))?;
        }
        self.stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        self.drawn = true;

        let buzzer = match indicators.buzzer {
            Some(hz) => format!("{:.0} Hz", hz),
            None => actuator::as_string(false),
        };

        writeln!(self.stdout, "+-------------------------+")?;
        writeln!(self.stdout, "| INDICATORS              |")?;
        writeln!(self.stdout, "+------------+------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} |", "MOVEMENT", actuator::as_string(indicators.movement))?;
        writeln!(self.stdout, "+------------+------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} |", "DOOR", actuator::as_string(indicators.door))?;
        writeln!(self.stdout, "+------------+------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} |", "EMERGENCY", actuator::as_string(indicators.emergency))?;
        writeln!(self.stdout, "+------------+------------+")?;
        writeln!(self.stdout, "| {0:<10} | {1:<10} |", "BUZZER", buzzer)?;
        writeln!(self.stdout, "+------------+------------+")?;

        Ok(())
    }
}
