use std::thread;

use crossbeam_channel::unbounded;
use log::{info, warn};

use shared_resources::config::{Args, MasterConfig};
use shared_resources::logging;

use crate::utilities::debug;
use crate::utilities::elevator_status::ElevatorStatus;
use crate::utilities::floor::Floor;
use crate::utilities::lcd::LcdLines;

mod fsm;
mod io;
mod keypad;
mod transport;

pub fn run() -> std::io::Result<()> {
    // READ CONFIGURATION
    let args = Args::from_env();
    logging::init(&args)?;
    let config = MasterConfig::get(&args)?;
    let initial_floor = Floor::new(config.initial_floor).ok_or_else(|| std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("initial floor {} is above {}", config.initial_floor, Floor::MAX),
    ))?;

    // INITIALIZE BUS
    let mut transport = transport::BusTransport::connect(&config.bus)?;
    info!("Master on bus port {}, slave at {:#04x}", config.bus.port, config.bus.slave_address);
    match transport.probe() {
        Ok(reply) => info!("Slave answered probe with {}", reply),
        Err(e) => warn!("Slave did not answer probe: {}", e),
    }

    // INITIALIZE DISPLAY
    let (display_tx, display_rx) = unbounded::<LcdLines>();
    let (elevator_status_tx, elevator_status_rx) = unbounded::<ElevatorStatus>();
    thread::Builder::new().name("debug".to_string()).spawn(move || {
        if let Err(e) = debug::main(display_rx, elevator_status_rx) {
            warn!("Status panel stopped: {}", e);
        }
    })?;

    // INITIALIZE KEYPAD
    let (keypad_rx, emergency_rx) = io::init(config.timing.poll_period)?;

    // RUN CONTROLLER ON THIS THREAD
    let controller = fsm::Controller::new(
        initial_floor,
        config.timing,
        transport,
        keypad_rx,
        emergency_rx,
        display_tx,
        elevator_status_tx,
    );
    let result = fsm::main(controller);
    io::restore_terminal();
    result
}
