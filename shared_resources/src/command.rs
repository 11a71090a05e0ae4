/// One-byte opcodes sent from the master to the slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MovementOn,
    MovementOff,
    FaultBlink,
    DoorOpen,
    DoorClose,
    Emergency,
    Unknown(u8),
}

impl Command {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Command::MovementOn,
            0x02 => Command::MovementOff,
            0x03 => Command::FaultBlink,
            0x04 => Command::DoorOpen,
            0x05 => Command::DoorClose,
            0x06 => Command::Emergency,
            other => Command::Unknown(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Command::MovementOn => 0x01,
            Command::MovementOff => 0x02,
            Command::FaultBlink => 0x03,
            Command::DoorOpen => 0x04,
            Command::DoorClose => 0x05,
            Command::Emergency => 0x06,
            Command::Unknown(byte) => byte,
        }
    }

    pub fn iter() -> impl Iterator<Item = Command> {
        [
            Command::MovementOn,
            Command::MovementOff,
            Command::FaultBlink,
            Command::DoorOpen,
            Command::DoorClose,
            Command::Emergency,
        ].iter().copied()
    }

    pub fn as_string(self) -> String {
        match self {
            Command::MovementOn => String::from("movement on"),
            Command::MovementOff => String::from("movement off"),
            Command::FaultBlink => String::from("fault blink"),
            Command::DoorOpen => String::from("door open"),
            Command::DoorClose => String::from("door close"),
            Command::Emergency => String::from("emergency"),
            Command::Unknown(byte) => format!("unknown {:#04x}", byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_opcodes_are_one_to_six() {
        let bytes: Vec<u8> = Command::iter().map(Command::as_byte).collect();
        assert_eq!(bytes, vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        for command in Command::iter() {
            assert_eq!(Command::from_byte(command.as_byte()), command);
        }
    }

    #[test]
    fn everything_else_is_unknown() {
        for byte in [0x00, 0x07, 0x57, 0xFF] {
            assert_eq!(Command::from_byte(byte), Command::Unknown(byte));
            assert_eq!(Command::from_byte(byte).as_byte(), byte);
        }
    }
}
