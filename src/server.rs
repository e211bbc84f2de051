use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::dns_message::DnsMessage;
use crate::dns_question_and_answer::RecordType;
use crate::error::Result;
use crate::resolver::Resolver;

/// Largest datagram read from the socket
const MAX_DATAGRAM: usize = 512;

/// DNS Server that handles incoming DNS requests
/// The socket lives exactly as long as the server value
pub struct DnsServer<R> {
    socket: UdpSocket,
    resolver: R,
}

impl<R: Resolver> DnsServer<R> {
    /// Create a new DNS server bound to the given address
    pub fn new(bind_addr: impl ToSocketAddrs, resolver: R) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)?;

        Ok(Self { socket, resolver })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Run the DNS server main loop
    /// Malformed requests are logged and dropped; only a receive error ends the loop
    pub fn run(&self) -> Result<()> {
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            let (size, source) = self.socket.recv_from(&mut buf)?;
            debug!(bytes = size, peer = %source, "received datagram");

            match self.handle_request(&buf[..size]) {
                Ok(response) => {
                    if let Err(e) = self.socket.send_to(&response, source) {
                        warn!(peer = %source, error = %e, "failed to send response");
                    }
                }
                Err(e) => {
                    warn!(peer = %source, error = %e, "dropping request");
                }
            }
        }
    }

    /// Handle a DNS request: parse, resolve, and build response
    fn handle_request(&self, buf: &[u8]) -> Result<Bytes> {
        let request = DnsMessage::parse(buf)?;

        for question in &request.questions {
            info!(
                id = request.header.id,
                name = %question.name,
                qtype = ?RecordType::from_u16(question.qtype),
                "answering question"
            );
        }

        request.encode_response(&self.resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use std::thread;
    use std::time::Duration;

    fn spawn_server() -> SocketAddr {
        let server = DnsServer::new("127.0.0.1:0", StaticResolver::default()).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());
        addr
    }

    fn client() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        socket
    }

    fn example_request() -> Vec<u8> {
        let mut request = vec![0x04, 0xD2, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
        request.extend_from_slice(&[
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0, 0, 1, 0, 1,
        ]);
        request
    }

    #[test]
    fn test_answers_over_udp() {
        let addr = spawn_server();
        let client = client();

        client.send_to(&example_request(), addr).unwrap();

        let mut buf = [0u8; MAX_DATAGRAM];
        let (size, from) = client.recv_from(&mut buf).unwrap();
        assert_eq!(from, addr);

        let response = &buf[..size];
        assert_eq!(&response[..8], &[0x04, 0xD2, 0x81, 0x00, 0, 1, 0, 1]);
        assert_eq!(&response[size - 4..], &[8, 8, 8, 8]);
    }

    #[test]
    fn test_malformed_request_gets_no_reply_and_loop_survives() {
        let addr = spawn_server();
        let client = client();

        client.send_to(&[0x04, 0xD2, 0x01], addr).unwrap();
        let mut buf = [0u8; MAX_DATAGRAM];
        assert!(client.recv_from(&mut buf).is_err());

        client.send_to(&example_request(), addr).unwrap();
        let (size, _) = client.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x04, 0xD2]);
        assert!(size > 12);
    }
}
