use std::io;
use std::net::{self, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

pub fn new_initiator(port: u16) -> io::Result<(UdpSocket, net::SocketAddr)> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    let local_addr = net::SocketAddr::from(([127, 0, 0, 1], 0));
    sock.bind(&local_addr.into())?;
    let remote_addr = net::SocketAddr::from(([127, 0, 0, 1], port));
    Ok((sock.into(), remote_addr))
}

pub fn new_responder(port: u16) -> io::Result<UdpSocket> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    sock.set_reuse_address(true)?;
    let local_addr = net::SocketAddr::from(([127, 0, 0, 1], port));
    sock.bind(&local_addr.into())?;
    Ok(sock.into())
}
