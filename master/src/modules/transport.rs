/// ----- TRANSPORT MODULE -----
/// How the controller reaches the slave. The controller only knows the
/// trait, so tests can stand in for the bus.

use std::io;

use log::debug;

use shared_resources::command::Command;
use shared_resources::config::BusConfig;
use twi_rust::twi::initiator::Initiator;
use twi_rust::twi::BusError;

pub trait CommandTransport {
    /// Delivers one opcode. Returns once the transaction is finished on the
    /// wire or its bounded wait has run out.
    fn send_command(&mut self, command: Command) -> Result<(), BusError>;
}

pub struct BusTransport {
    initiator: Initiator,
    slave_address: u8,
}

impl BusTransport {
    pub fn connect(config: &BusConfig) -> io::Result<Self> {
        Ok(BusTransport {
            initiator: Initiator::connect(config.port, config.timeout)?,
            slave_address: config.slave_address,
        })
    }

    /// Reads one byte back from the slave.
    pub fn probe(&mut self) -> Result<u8, BusError> {
        self.initiator.read(self.slave_address)
    }
}

impl CommandTransport for BusTransport {
    fn send_command(&mut self, command: Command) -> Result<(), BusError> {
        debug!("Sending {} to {:#04x}", command.as_string(), self.slave_address);
        self.initiator.write(self.slave_address, command.as_byte())
    }
}

#[cfg(test)]
mod tests {
    use std::net::UdpSocket;
    use std::time::Duration;

    use twi_rust::twi::responder::Responder;
    use twi_rust::twi::status::SlaveStatus;
    use twi_rust::twi::Phase;

    use super::*;

    fn bus_config(port: u16, timeout: Duration) -> BusConfig {
        BusConfig {
            port: port,
            slave_address: 0x57,
            general_call: false,
            timeout: timeout,
        }
    }

    #[test]
    fn commands_arrive_as_single_bytes() {
        let responder = Responder::bind(0, 0x57, false).unwrap();
        let mut transport = BusTransport::connect(&bus_config(responder.port(), Duration::from_secs(2))).unwrap();

        let listener = std::thread::spawn(move || {
            let mut received = Vec::new();
            while received.len() < 2 {
                let event = responder.wait_for_event().unwrap();
                match event.status {
                    SlaveStatus::OwnAddressRead => responder.load(1),
                    status if status.is_addressed_write() => received.push(event.data),
                    _ => (),
                }
                responder.rearm();
            }
            received
        });

        transport.send_command(Command::DoorOpen).unwrap();
        assert_eq!(transport.probe().unwrap(), 1);
        transport.send_command(Command::Emergency).unwrap();
        assert_eq!(listener.join().unwrap(), vec![0x04, 0x06]);
    }

    #[test]
    fn silent_slave_is_a_timeout() {
        let port = UdpSocket::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let mut transport = BusTransport::connect(&bus_config(port, Duration::from_millis(100))).unwrap();

        match transport.send_command(Command::MovementOn) {
            Err(BusError::Timeout { phase }) => assert_eq!(phase, Phase::Start),
            other => panic!("expected a timeout, got {:?}", other),
        }
    }
}
