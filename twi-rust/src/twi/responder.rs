use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, RecvError, Sender};
use log::{debug, error, warn};

use super::frame::{self, Flag, Frame, Signal};
use super::sock;
use super::status::{MasterStatus, SlaveStatus};
use super::BusError;

/// A bus condition that needs the responder application's attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusEvent {
    pub status: SlaveStatus,
    pub data: u8,
}

/// Application side of a bus slave. The bus hardware runs on its own thread;
/// after it reports an event it holds the bus until `rearm` is called.
pub struct Responder {
    events_rx: Receiver<BusEvent>,
    rearm_tx: Sender<()>,
    data_register: Arc<AtomicU8>,
    port: u16,
}

impl Responder {
    pub fn bind(port: u16, address: u8, general_call: bool) -> io::Result<Self> {
        let sock = sock::new_responder(port)?;
        let port = sock.local_addr()?.port();

        let (events_tx, events_rx) = unbounded();
        let (rearm_tx, rearm_rx) = unbounded();
        let data_register = Arc::new(AtomicU8::new(0));

        let hardware = Hardware {
            sock: sock,
            address: address,
            general_call: general_call,
            events_tx: events_tx,
            rearm_rx: rearm_rx,
            data_register: data_register.clone(),
            armed: true,
            transaction: Transaction::Idle,
        };
        thread::Builder::new().name("twi_responder".to_string()).spawn(move || {
            if let Err(e) = hardware.run() {
                error!("Bus responder stopped: {}", e);
            }
        })?;

        Ok(Responder {
            events_rx: events_rx,
            rearm_tx: rearm_tx,
            data_register: data_register,
            port: port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Blocks until a transaction is pending.
    pub fn wait_for_event(&self) -> Result<BusEvent, RecvError> {
        self.events_rx.recv()
    }

    pub fn poll_event(&self) -> Option<BusEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Loads the byte returned to the next read.
    pub fn load(&self, data: u8) {
        self.data_register.store(data, Ordering::SeqCst);
    }

    /// Releases the bus for the next phase.
    pub fn rearm(&self) {
        // a stopped hardware thread has nothing left to release
        let _ = self.rearm_tx.send(());
    }
}

enum Transaction {
    Idle,
    Write { general_call: bool, received: usize },
    Read,
    Foreign,
}

/// The application dropped its `Responder`.
struct Detached;

struct Hardware {
    sock: UdpSocket,
    address: u8,
    general_call: bool,
    events_tx: Sender<BusEvent>,
    rearm_rx: Receiver<()>,
    data_register: Arc<AtomicU8>,
    armed: bool,
    transaction: Transaction,
}

impl Hardware {
    fn run(mut self) -> Result<(), BusError> {
        let mut buf = [0; 1024];

        loop {
            let (n, from) = self.sock.recv_from(&mut buf)?;
            let frame: Frame = match frame::decode(&buf[..n]) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Received bad frame: {}", e);
                    continue;
                },
            };

            // clock stretching: nothing moves on the bus until the application released it
            if self.wait_until_armed().is_err() {
                return Ok(());
            }

            match self.handle(frame.signal) {
                Ok(Some((status, data))) => self.reply(from, frame.seq, status, data)?,
                Ok(None) => (),
                Err(Detached) => return Ok(()),
            }
        }
    }

    fn handle(&mut self, signal: Signal) -> Result<Option<(MasterStatus, u8)>, Detached> {
        match signal {
            Signal::Start => {
                self.transaction = Transaction::Idle;
                Ok(Some((MasterStatus::Start, 0)))
            },
            Signal::Address { address, read } => {
                let own = address == self.address;
                let general_call = self.general_call && address == 0 && !read;
                if !own && !general_call {
                    debug!("Ignoring transaction for address {:#04x}", address);
                    self.transaction = Transaction::Foreign;
                    let status = if read { MasterStatus::AddressReadNack } else { MasterStatus::AddressWriteNack };
                    return Ok(Some((status, 0)));
                }

                if read {
                    self.transaction = Transaction::Read;
                    self.post(SlaveStatus::OwnAddressRead, address)?;
                    // the reply byte has to be loaded before it can be clocked out
                    self.wait_until_armed()?;
                    Ok(Some((MasterStatus::AddressReadAck, self.data_register.load(Ordering::SeqCst))))
                } else {
                    self.transaction = Transaction::Write { general_call: general_call, received: 0 };
                    let status = if general_call { SlaveStatus::GeneralCall } else { SlaveStatus::OwnAddressWrite };
                    self.post(status, address)?;
                    Ok(Some((MasterStatus::AddressWriteAck, 0)))
                }
            },
            Signal::Data(byte) => match &mut self.transaction {
                Transaction::Write { general_call, received } => {
                    let first = *received == 0;
                    *received += 1;
                    let status = match (*general_call, first) {
                        (false, true) => SlaveStatus::DataReceived,
                        (false, false) => SlaveStatus::DataNack,
                        (true, true) => SlaveStatus::GeneralCallData,
                        (true, false) => SlaveStatus::GeneralCallDataNack,
                    };
                    self.post(status, byte)?;
                    Ok(Some((if first { MasterStatus::DataAck } else { MasterStatus::DataNack }, 0)))
                },
                Transaction::Idle | Transaction::Read | Transaction::Foreign => {
                    Ok(Some((MasterStatus::DataNack, 0)))
                },
            },
            Signal::Stop => {
                let ours = matches!(self.transaction, Transaction::Write { .. } | Transaction::Read);
                self.transaction = Transaction::Idle;
                if ours {
                    self.post(SlaveStatus::Stop, 0)?;
                }
                Ok(None)
            },
        }
    }

    fn post(&mut self, status: SlaveStatus, data: u8) -> Result<(), Detached> {
        self.armed = false;
        self.events_tx.send(BusEvent { status: status, data: data }).map_err(|_| Detached)
    }

    fn wait_until_armed(&mut self) -> Result<(), Detached> {
        if !self.armed {
            self.rearm_rx.recv().map_err(|_| Detached)?;
            self.armed = true;
        }
        Ok(())
    }

    fn reply(&self, to: SocketAddr, seq: u32, status: MasterStatus, data: u8) -> Result<(), BusError> {
        let bytes = frame::encode(&Flag { seq: seq, status: status.code(), data: data })?;
        if let Err(e) = self.sock.send_to(&bytes, to) {
            warn!("Unable to send flag, {}", e);
        }
        Ok(())
    }
}
