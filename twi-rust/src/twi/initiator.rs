use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::frame::{self, Flag, Frame, Signal};
use super::sock;
use super::status::MasterStatus;
use super::{BusError, Phase};

/// Bus master. Owns the only side of the bus allowed to start a transaction,
/// and every wait for a phase flag is bounded by `timeout`.
pub struct Initiator {
    sock: UdpSocket,
    peer: SocketAddr,
    timeout: Duration,
    seq: u32,
}

impl Initiator {
    pub fn connect(port: u16, timeout: Duration) -> io::Result<Self> {
        let (sock, peer) = sock::new_initiator(port)?;
        Ok(Initiator {
            sock: sock,
            peer: peer,
            timeout: timeout,
            seq: 0,
        })
    }

    /// One write transaction: start, SLA+W, one data byte, stop.
    /// NACKs are reported in the log but do not fail the transaction.
    pub fn write(&mut self, address: u8, data: u8) -> Result<(), BusError> {
        self.transaction(|initiator| {
            initiator.phase(Phase::Start, Signal::Start)?;

            let status = initiator.phase(Phase::Address, Signal::Address { address: address, read: false })?;
            if status.is_nack() {
                warn!("Address {:#04x} not acknowledged ({:#04x})", address, status.code());
            }

            let status = initiator.phase(Phase::Data, Signal::Data(data))?;
            if status.is_nack() {
                warn!("Data byte {:#04x} not acknowledged ({:#04x})", data, status.code());
            }
            Ok(())
        })
    }

    /// One read transaction: start, SLA+R, one data byte clocked in, stop.
    pub fn read(&mut self, address: u8) -> Result<u8, BusError> {
        self.transaction(|initiator| {
            initiator.phase(Phase::Start, Signal::Start)?;

            let seq = initiator.signal(Signal::Address { address: address, read: true })?;
            let flag = initiator.wait_for_flag(Phase::Address, seq)?;
            let status = MasterStatus::from_code(flag.status);
            if status.is_nack() {
                warn!("Address {:#04x} not acknowledged for reading ({:#04x})", address, status.code());
            }
            Ok(flag.data)
        })
    }

    // The stop is put on the wire whether the body succeeded or not, so a
    // timed out transaction never leaves the bus claimed.
    fn transaction<T, F>(&mut self, body: F) -> Result<T, BusError>
    where
        F: FnOnce(&mut Self) -> Result<T, BusError>,
    {
        let result = body(self);
        let stop = self.signal(Signal::Stop);
        let value = result?;
        stop?;
        Ok(value)
    }

    fn phase(&mut self, phase: Phase, signal: Signal) -> Result<MasterStatus, BusError> {
        let seq = self.signal(signal)?;
        let flag = self.wait_for_flag(phase, seq)?;
        let status = MasterStatus::from_code(flag.status);
        debug!("{} phase done, status {:#04x}", phase, status.code());
        Ok(status)
    }

    fn signal(&mut self, signal: Signal) -> Result<u32, BusError> {
        self.seq = self.seq.wrapping_add(1);
        let bytes = frame::encode(&Frame { seq: self.seq, signal: signal })?;
        self.sock.send_to(&bytes, self.peer)?;
        Ok(self.seq)
    }

    fn wait_for_flag(&self, phase: Phase, seq: u32) -> Result<Flag, BusError> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0; 1024];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(BusError::Timeout { phase: phase });
            }
            self.sock.set_read_timeout(Some(remaining))?;

            match self.sock.recv(&mut buf) {
                Ok(n) => match frame::decode::<Flag>(&buf[..n]) {
                    Ok(flag) if flag.seq == seq => return Ok(flag),
                    Ok(flag) => debug!("Discarding stale flag {} while waiting for {}", flag.seq, seq),
                    Err(e) => warn!("Received bad flag: {}", e),
                },
                Err(e) => match e.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                        return Err(BusError::Timeout { phase: phase });
                    },
                    // nobody bound on the peer port yet, keep waiting until the deadline
                    io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => (),
                    _ => return Err(e.into()),
                },
            }
        }
    }
}
