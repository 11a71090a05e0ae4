/// ----- FSM MODULE -----
/// The elevator controller. One call to `step` runs the action of the
/// current state and moves to the next one; movement advances one floor per
/// step. Every step ends with a status snapshot.

use std::io;
use std::thread;

use crossbeam_channel::{Receiver, RecvError, Sender};
use log::{debug, error, info, warn};

use shared_resources::command::Command;
use shared_resources::config::MasterTiming;
use twi_rust::twi::BusError;

use super::keypad;
use super::transport::CommandTransport;
use crate::utilities::elevator_status::{DoorStatus, ElevatorState, ElevatorStatus};
use crate::utilities::floor::Floor;
use crate::utilities::lcd::LcdLines;

#[derive(Debug)]
enum StepError {
    Transport(BusError),
    Keypad(RecvError),
}

impl From<BusError> for StepError {
    fn from(e: BusError) -> Self {
        StepError::Transport(e)
    }
}

impl From<RecvError> for StepError {
    fn from(e: RecvError) -> Self {
        StepError::Keypad(e)
    }
}

pub struct Controller<T: CommandTransport> {
    state: ElevatorState,
    current_floor: Floor,
    selected_floor: Floor,
    door: DoorStatus,
    transport_fault: bool,
    transport: T,
    timing: MasterTiming,
    keypad_rx: Receiver<char>,
    emergency_rx: Receiver<bool>,
    display_tx: Sender<LcdLines>,
    elevator_status_tx: Sender<ElevatorStatus>,
}

impl<T: CommandTransport> Controller<T> {
    pub fn new(
        initial_floor: Floor,
        timing: MasterTiming,
        transport: T,
        keypad_rx: Receiver<char>,
        emergency_rx: Receiver<bool>,
        display_tx: Sender<LcdLines>,
        elevator_status_tx: Sender<ElevatorStatus>,
    ) -> Self {
        Controller {
            state: ElevatorState::Idle,
            current_floor: initial_floor,
            selected_floor: initial_floor,
            door: DoorStatus::Closed,
            transport_fault: false,
            transport: transport,
            timing: timing,
            keypad_rx: keypad_rx,
            emergency_rx: emergency_rx,
            display_tx: display_tx,
            elevator_status_tx: elevator_status_tx,
        }
    }

    pub fn state(&self) -> ElevatorState {
        self.state
    }

    pub fn status(&self) -> ElevatorStatus {
        ElevatorStatus {
            state: self.state,
            current_floor: self.current_floor,
            selected_floor: self.selected_floor,
            door: self.door,
            transport_fault: self.transport_fault,
        }
    }

    /// Fails only when the keypad is gone. A failed bus transaction moves
    /// the controller to `Fault` instead.
    pub fn step(&mut self) -> Result<(), RecvError> {
        let result = match self.state {
            ElevatorState::Idle => self.idle(),
            ElevatorState::FloorSelected => self.floor_selected(),
            ElevatorState::Moving => self.moving(),
            ElevatorState::DoorOpen => self.door_open(),
            ElevatorState::Fault => self.fault(),
        };

        match result {
            Ok(next) => {
                if next != self.state {
                    debug!("{} -> {}", self.state.as_string(), next.as_string());
                    // the keypad is only read while a floor is being chosen
                    if next == ElevatorState::Idle {
                        self.discard_keys();
                    }
                }
                self.state = next;
            },
            Err(StepError::Transport(e)) => {
                error!("Lost the slave in state {}: {}", self.state.as_string(), e);
                self.door = DoorStatus::Closed;
                self.transport_fault = true;
                self.state = ElevatorState::Fault;
            },
            Err(StepError::Keypad(e)) => return Err(e),
        }

        self.publish_status();
        Ok(())
    }

    fn idle(&mut self) -> Result<ElevatorState, StepError> {
        self.show("Floor:", self.current_floor);
        self.selected_floor = keypad::read_floor(&self.keypad_rx, &self.display_tx, self.timing.debounce)?;
        info!("Floor {} selected", self.selected_floor);
        Ok(ElevatorState::FloorSelected)
    }

    fn floor_selected(&mut self) -> Result<ElevatorState, StepError> {
        if self.selected_floor == self.current_floor {
            self.send(Command::FaultBlink)?;
            self.show("Already on", self.current_floor);
            thread::sleep(self.timing.already_there);
            return Ok(ElevatorState::DoorOpen);
        }

        self.send(Command::MovementOn)?;
        self.show("Moving to", self.selected_floor);
        thread::sleep(self.timing.movement_start);

        // only presses made while the car moves count
        let stale = self.emergency_rx.try_iter().count();
        if stale > 0 {
            debug!("Discarding {} emergency presses made before departure", stale);
        }
        Ok(ElevatorState::Moving)
    }

    fn moving(&mut self) -> Result<ElevatorState, StepError> {
        self.show("Current floor", self.current_floor);
        thread::sleep(self.timing.floor_step);

        if self.current_floor == self.selected_floor {
            self.send(Command::MovementOff)?;
            self.show("Arrived on", self.current_floor);
            thread::sleep(self.timing.arrival);
            return Ok(ElevatorState::DoorOpen);
        }

        self.current_floor = self.current_floor.step_toward(self.selected_floor);
        self.publish_status();

        if self.emergency_pressed() {
            self.emergency()?;
            return Ok(ElevatorState::Idle);
        }
        Ok(ElevatorState::Moving)
    }

    fn door_open(&mut self) -> Result<ElevatorState, StepError> {
        thread::sleep(self.timing.door_prepare);
        self.door = DoorStatus::Open;
        self.show("Arrived on", self.current_floor);
        self.publish_status();

        self.send(Command::DoorOpen)?;
        thread::sleep(self.timing.door_hold);
        self.send(Command::DoorClose)?;

        self.door = DoorStatus::Closed;
        Ok(ElevatorState::Idle)
    }

    fn fault(&mut self) -> Result<ElevatorState, StepError> {
        self.show("Bus fault", self.current_floor);
        thread::sleep(self.timing.fault_display);
        Ok(ElevatorState::Idle)
    }

    /// The car stops where it is, the slave blinks until someone presses a
    /// key and then sounds the alarm. The movement indicator is left as is.
    fn emergency(&mut self) -> Result<(), StepError> {
        warn!("Emergency stop at floor {}", self.current_floor);
        self.door = DoorStatus::Closed;
        self.show("EMERGENCY", self.current_floor);

        // the acknowledgement has to be a fresh press
        self.discard_keys();
        self.send(Command::FaultBlink)?;
        let key = keypad::wait_for_acknowledge(&self.keypad_rx)?;
        info!("Emergency acknowledged with {}", key);

        self.send(Command::Emergency)?;
        Ok(())
    }

    fn discard_keys(&self) {
        let stale = self.keypad_rx.try_iter().count();
        if stale > 0 {
            debug!("Discarding {} keys pressed while busy", stale);
        }
    }

    fn emergency_pressed(&self) -> bool {
        self.emergency_rx.try_iter().fold(false, |pressed, press| pressed || press)
    }

    fn send(&mut self, command: Command) -> Result<(), BusError> {
        self.transport.send_command(command)?;
        self.transport_fault = false;
        Ok(())
    }

    fn show(&self, message: &str, floor: Floor) {
        let line1 = format!("{} {}", message, floor);
        let _ = self.display_tx.send(LcdLines::new(&line1, &self.door.as_string()));
    }

    fn publish_status(&self) {
        let status = self.status();
        match serde_json::to_string(&status) {
            Ok(json) => debug!("Status {}", json),
            Err(e) => warn!("Failed to serialize status: {}", e),
        }
        let _ = self.elevator_status_tx.send(status);
    }
}

pub fn main<T: CommandTransport>(mut controller: Controller<T>) -> io::Result<()> {
    loop {
        controller.step()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "keypad input closed"))?;
    }
}
