/// ----- INTERPRETER MODULE -----
/// This module listens on the bus for transactions addressed to this node,
/// decodes the received byte into a command and drives the indicators.
/// Every effect blocks the listener until it is done.

use std::io;
use std::thread;

use crossbeam_channel::{SendError, Sender};
use log::{debug, info, warn};

use shared_resources::command::Command;
use shared_resources::config::BlinkConfig;
use twi_rust::twi::responder::Responder;
use twi_rust::twi::status::SlaveStatus;

use super::alarm::Alarm;
use crate::utilities::actuator::ActuatorEvent;

/// Byte returned to a read probe from the master.
pub const PLACEHOLDER_REPLY: u8 = 1;

pub struct Interpreter {
    actuator_tx: Sender<ActuatorEvent>,
    blink: BlinkConfig,
    alarm: Alarm,
}

impl Interpreter {
    pub fn new(actuator_tx: Sender<ActuatorEvent>, blink: BlinkConfig, alarm: Alarm) -> Self {
        Interpreter {
            actuator_tx: actuator_tx,
            blink: blink,
            alarm: alarm,
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<(), SendError<ActuatorEvent>> {
        match command {
            Command::MovementOn => self.actuator_tx.send(ActuatorEvent::MovementLight(true))?,
            Command::MovementOff => self.actuator_tx.send(ActuatorEvent::MovementLight(false))?,
            Command::FaultBlink => {
                for _ in 0..self.blink.count {
                    self.actuator_tx.send(ActuatorEvent::MovementLight(true))?;
                    thread::sleep(self.blink.hold);
                    self.actuator_tx.send(ActuatorEvent::MovementLight(false))?;
                    thread::sleep(self.blink.hold);
                }
            },
            Command::DoorOpen => self.actuator_tx.send(ActuatorEvent::DoorLight(true))?,
            Command::DoorClose => self.actuator_tx.send(ActuatorEvent::DoorLight(false))?,
            Command::Emergency => self.alarm.run()?,
            Command::Unknown(byte) => debug!("No effect for byte {:#04x}", byte),
        }
        Ok(())
    }
}

pub fn main(responder: Responder, mut interpreter: Interpreter) -> io::Result<()> {
    loop {
        let event = responder.wait_for_event()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "bus responder stopped"))?;

        match event.status {
            status if status.is_addressed_write() => {
                let command = Command::from_byte(event.data);
                info!("Received {} ({})", event.data, command.as_string());
                interpreter.execute(command)
                    .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "indicator output closed"))?;
            },
            status if status.is_nacked_data() => {
                warn!("Received {} without acknowledging it, ignoring", event.data);
            },
            SlaveStatus::OwnAddressRead => responder.load(PLACEHOLDER_REPLY),
            SlaveStatus::Stop => debug!("Stop condition"),
            status => debug!("Bus status {:#04x}", status.code()),
        }

        responder.rearm();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::{unbounded, Receiver};
    use shared_resources::config::AlarmConfig;

    use super::*;

    fn interpreter(blink_hold: Duration) -> (Interpreter, Receiver<ActuatorEvent>) {
        let (actuator_tx, actuator_rx) = unbounded();
        let alarm = Alarm::new(
            AlarmConfig { base_compare: 1000, compare_step: 750, steps: 6, step_hold: Duration::ZERO },
            actuator_tx.clone(),
        );
        let blink = BlinkConfig { count: 3, hold: blink_hold };
        (Interpreter::new(actuator_tx, blink, alarm), actuator_rx)
    }

    #[test]
    fn single_pin_commands() {
        let (mut interpreter, actuator_rx) = interpreter(Duration::ZERO);
        for byte in [0x01, 0x04, 0x05, 0x02] {
            interpreter.execute(Command::from_byte(byte)).unwrap();
        }
        let events: Vec<ActuatorEvent> = actuator_rx.try_iter().collect();
        assert_eq!(events, vec![
            ActuatorEvent::MovementLight(true),
            ActuatorEvent::DoorLight(true),
            ActuatorEvent::DoorLight(false),
            ActuatorEvent::MovementLight(false),
        ]);
    }

    #[test]
    fn fault_blink_toggles_three_times_with_holds() {
        let hold = Duration::from_millis(20);
        let (mut interpreter, actuator_rx) = interpreter(hold);

        let started = Instant::now();
        interpreter.execute(Command::FaultBlink).unwrap();
        assert!(started.elapsed() >= hold * 6);

        let events: Vec<ActuatorEvent> = actuator_rx.try_iter().collect();
        let expected: Vec<ActuatorEvent> = (0..3)
            .flat_map(|_| [ActuatorEvent::MovementLight(true), ActuatorEvent::MovementLight(false)])
            .collect();
        assert_eq!(events, expected);
    }

    #[test]
    fn unknown_bytes_have_no_effect() {
        let (mut interpreter, actuator_rx) = interpreter(Duration::ZERO);
        for byte in [0x00, 0x07, 0x42, 0xFF] {
            interpreter.execute(Command::from_byte(byte)).unwrap();
        }
        assert!(actuator_rx.try_recv().is_err());
    }

    #[test]
    fn emergency_runs_the_alarm() {
        let (mut interpreter, actuator_rx) = interpreter(Duration::ZERO);
        interpreter.execute(Command::Emergency).unwrap();

        let events: Vec<ActuatorEvent> = actuator_rx.try_iter().collect();
        assert_eq!(events.first(), Some(&ActuatorEvent::EmergencyLight(true)));
        assert_eq!(events.last(), Some(&ActuatorEvent::EmergencyLight(false)));
        assert_eq!(events.len(), 1 + 6 + 2);
    }

    #[test]
    fn listener_executes_bus_writes_and_answers_probes() {
        use twi_rust::twi::initiator::Initiator;

        let (interpreter, actuator_rx) = interpreter(Duration::ZERO);
        let responder = Responder::bind(0, 0x57, false).unwrap();
        let mut initiator = Initiator::connect(responder.port(), Duration::from_secs(2)).unwrap();
        thread::spawn(move || main(responder, interpreter));

        initiator.write(0x57, 0x04).unwrap();
        initiator.write(0x57, 0x99).unwrap();
        assert_eq!(initiator.read(0x57).unwrap(), PLACEHOLDER_REPLY);
        initiator.write(0x57, 0x05).unwrap();

        assert_eq!(actuator_rx.recv_timeout(Duration::from_secs(2)).unwrap(), ActuatorEvent::DoorLight(true));
        assert_eq!(actuator_rx.recv_timeout(Duration::from_secs(2)).unwrap(), ActuatorEvent::DoorLight(false));
    }
}
