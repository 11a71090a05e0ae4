use crate::utilities::floor::Floor;

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ElevatorState {
    Idle,
    FloorSelected,
    Moving,
    DoorOpen,
    Fault,
}

impl ElevatorState {
    pub fn as_string(&self) -> String {
        match self {
            ElevatorState::Idle => String::from("idle"),
            ElevatorState::FloorSelected => String::from("floorSelected"),
            ElevatorState::Moving => String::from("moving"),
            ElevatorState::DoorOpen => String::from("doorOpen"),
            ElevatorState::Fault => String::from("fault"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum DoorStatus {
    Open,
    Closed,
}

impl DoorStatus {
    /// Second line of the display.
    pub fn as_string(&self) -> String {
        match self {
            DoorStatus::Open => String::from("Door open"),
            DoorStatus::Closed => String::from("Door closed"),
        }
    }
}

/// Snapshot published by the controller after every step.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct ElevatorStatus {
    pub state: ElevatorState,
    pub current_floor: Floor,
    pub selected_floor: Floor,
    pub door: DoorStatus,
    pub transport_fault: bool,
}
