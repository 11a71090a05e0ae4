/// ----- I/O MODULE -----
/// This module owns the output pins of the slave. It returns the channel the
/// other modules drive the indicators through and draws their state.

use std::thread;

use crossbeam_channel::{unbounded, Sender};
use log::warn;

use crate::utilities::actuator::{ActuatorEvent, Indicators};
use crate::utilities::debug::Debug;

pub fn init() -> std::io::Result<Sender<ActuatorEvent>> {
    let (actuator_tx, actuator_rx) = unbounded::<ActuatorEvent>();

    thread::Builder::new().name("indicators".to_string()).spawn(move || {
        let mut indicators = Indicators::default();
        let mut debug = Debug::new();
        if let Err(e) = debug.printstatus(&indicators) {
            warn!("Unable to draw indicators, {}", e);
        }
        for event in actuator_rx.iter() {
            indicators.apply(event);
            if let Err(e) = debug.printstatus(&indicators) {
                warn!("Unable to draw indicators, {}", e);
            }
        }
    })?;

    // all pins start low
    actuator_tx.send(ActuatorEvent::MovementLight(false)).ok();
    actuator_tx.send(ActuatorEvent::DoorLight(false)).ok();
    actuator_tx.send(ActuatorEvent::EmergencyLight(false)).ok();

    Ok(actuator_tx)
}
