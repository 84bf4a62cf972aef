//! Transport
//!
//! Byte streams the session runs over, and the connectors that open them.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{GateError, Result};

/// A bidirectional byte stream to the remote console
pub trait Transport: Read + Write + Send {}

impl<T: Read + Write + Send> Transport for T {}

/// Opens fresh transports to one endpoint
///
/// The gateway calls `connect` every time it needs a new session. Tests plug in
/// connectors that hand out in-memory streams.
pub trait Connector: Send + Sync {
    /// Open a new transport
    fn connect(&self) -> Result<Box<dyn Transport>>;

    /// Endpoint description for logging
    fn endpoint(&self) -> String;
}

// =============================================================================
// TCP
// =============================================================================

/// Connects to the remote console over TCP
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpConnector {
    /// Create a connector for `addr` (`host:port`)
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Create a connector from the process configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rcon_addr(), config.connect_timeout())
            .with_timeouts(config.read_timeout(), config.write_timeout())
    }

    /// Configure per-packet read and write timeouts (`None` blocks forever)
    pub fn with_timeouts(mut self, read: Option<Duration>, write: Option<Duration>) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    fn unreachable(&self, source: io::Error) -> GateError {
        GateError::Unreachable {
            addr: self.addr.clone(),
            source,
        }
    }

    fn open_stream(&self) -> Result<TcpStream> {
        let addrs = self
            .addr
            .to_socket_addrs()
            .map_err(|e| self.unreachable(e))?;

        // Try every resolved address, keep the last failure
        let mut last_err = io::Error::new(
            io::ErrorKind::NotFound,
            "host name resolved to no addresses",
        );
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = e;
                }
            }
        }

        Err(self.unreachable(last_err))
    }
}

impl Connector for TcpConnector {
    fn connect(&self) -> Result<Box<dyn Transport>> {
        let stream = self.open_stream()?;
        let transport = TcpTransport::new(stream, self.read_timeout, self.write_timeout)?;
        tracing::debug!("Connected to {}", transport.peer_addr());
        Ok(Box::new(transport))
    }

    fn endpoint(&self) -> String {
        self.addr.clone()
    }
}

/// Buffered TCP stream to the remote console
pub struct TcpTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Wrap a connected stream
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn new(
        stream: TcpStream,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm, every packet is a complete request
        stream.set_nodelay(true)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_write_timeout(write_timeout)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Read for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for TcpTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
