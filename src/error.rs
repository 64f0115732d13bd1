use embassy_time::TimeoutError;

use crate::at_command::{CallError, DnsError, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transport failed to read or write.
    Serial,

    /// The modem did not send anything back in time.
    Timeout,

    /// The modem answered with `ERROR`, `+CME ERROR` or `+CMS ERROR`.
    Sim(SimError),

    /// A call could not be set up.
    Call(CallError),

    /// The modem answered, but not with anything we know how to interpret.
    UnexpectedResponse,

    /// The formatted command does not fit in [crate::at_command::MAX_COMMAND_LEN] bytes.
    CommandTooLong,

    /// Payload is empty or larger than what the modem accepts in one go.
    PayloadTooLarge,

    /// Multi-IP connection ids range from 0 to 7.
    InvalidConnection,

    /// Fewer than four octets could be read from an address reply.
    InvalidIp,

    /// The modem failed to resolve a domain name.
    Dns(DnsError),
    ConnectFailed,
    SendFailed,

    /// Neither the `AT` handshake nor the ready banner came through during `begin`.
    NotResponding,
}

impl embedded_io_async::Error for Error {
    fn kind(&self) -> embedded_io_async::ErrorKind {
        match self {
            Error::Serial => embedded_io_async::ErrorKind::Other,
            Error::Timeout => embedded_io_async::ErrorKind::TimedOut,
            Error::Sim(_) => embedded_io_async::ErrorKind::Other,
            Error::Call(_) => embedded_io_async::ErrorKind::ConnectionRefused,
            Error::UnexpectedResponse => embedded_io_async::ErrorKind::InvalidData,
            Error::CommandTooLong => embedded_io_async::ErrorKind::OutOfMemory,
            Error::PayloadTooLarge => embedded_io_async::ErrorKind::InvalidInput,
            Error::InvalidConnection => embedded_io_async::ErrorKind::InvalidInput,
            Error::InvalidIp => embedded_io_async::ErrorKind::InvalidData,
            Error::Dns(_) => embedded_io_async::ErrorKind::AddrNotAvailable,
            Error::ConnectFailed => embedded_io_async::ErrorKind::ConnectionRefused,
            Error::SendFailed => embedded_io_async::ErrorKind::BrokenPipe,
            Error::NotResponding => embedded_io_async::ErrorKind::NotConnected,
        }
    }
}

impl From<TimeoutError> for Error {
    fn from(_: TimeoutError) -> Self {
        Error::Timeout
    }
}
