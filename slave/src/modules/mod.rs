use log::info;

use shared_resources::config::{Args, SlaveConfig};
use shared_resources::logging;
use twi_rust::twi::responder::Responder;

mod alarm;
mod interpreter;
mod io;

pub fn run() -> std::io::Result<()> {
    // READ CONFIGURATION
    let args = Args::from_env();
    logging::init(&args)?;
    let config = SlaveConfig::get(&args)?;

    // INITIALIZE BUS
    let responder = Responder::bind(
        config.bus.port,
        config.bus.slave_address,
        config.bus.general_call,
    )?;
    info!("Slave {:#04x} listening on bus port {}", config.bus.slave_address, responder.port());

    // INITIALIZE OUTPUTS
    let actuator_tx = io::init()?;

    // RUN INTERPRETER ON THIS THREAD
    let alarm = alarm::Alarm::new(config.alarm, actuator_tx.clone());
    let interpreter = interpreter::Interpreter::new(actuator_tx, config.blink, alarm);
    interpreter::main(responder, interpreter)
}
