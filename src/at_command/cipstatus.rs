use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::{find_bytes, Error};

/// AT+CIPSTATUS
///
/// The state follows the `OK` on a line of its own, `STATE: <state>`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetConnectionStatus;

/// AT+CIPSTATUS=<n>
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetClientStatus(pub u8);

impl AtRequest for GetConnectionStatus {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIPSTATUS"))
    }
}

impl AtRequest for GetClientStatus {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIPSTATUS={}", self.0))
    }
}

/// State of the IP session, as reported after `STATE:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    IpInitial,
    IpStart,
    IpConfig,
    IpGprsAct,
    IpStatus,
    ConnectingOrListening,
    ConnectOk,
    Closing,
    Closed,
    PdpDeact,

    /// The state could not be read.
    QueryError,
}

/// State of one connection in Multi-IP mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientState {
    Initial,
    Connecting,
    Connected,
    RemoteClosing,
    Closing,
    Closed,
    QueryError,
}

impl ConnectionState {
    /// Tokens are tested in order, the first one found wins.
    const TOKENS: [(&'static [u8], ConnectionState); 11] = [
        (b"IP INITIAL", ConnectionState::IpInitial),
        (b"IP START", ConnectionState::IpStart),
        (b"IP CONFIG", ConnectionState::IpConfig),
        (b"IP GPRSACT", ConnectionState::IpGprsAct),
        (b"IP STATUS", ConnectionState::IpStatus),
        (b"CONNECTING", ConnectionState::ConnectingOrListening),
        (b"LISTENING", ConnectionState::ConnectingOrListening),
        (b"CONNECT OK", ConnectionState::ConnectOk),
        (b"CLOSING", ConnectionState::Closing),
        (b"CLOSED", ConnectionState::Closed),
        (b"PDP DEACT", ConnectionState::PdpDeact),
    ];

    pub fn classify(state: &[u8]) -> ConnectionState {
        classify(state, &Self::TOKENS).unwrap_or(ConnectionState::QueryError)
    }
}

impl ClientState {
    const TOKENS: [(&'static [u8], ClientState); 6] = [
        (b"INITIAL", ClientState::Initial),
        (b"CONNECTING", ClientState::Connecting),
        (b"CONNECTED", ClientState::Connected),
        (b"REMOTE CLOSING", ClientState::RemoteClosing),
        (b"CLOSING", ClientState::Closing),
        (b"CLOSED", ClientState::Closed),
    ];

    pub fn classify(line: &[u8]) -> ClientState {
        classify(line, &Self::TOKENS).unwrap_or(ClientState::QueryError)
    }
}

fn classify<T: Copy>(text: &[u8], tokens: &[(&[u8], T)]) -> Option<T> {
    tokens
        .iter()
        .find(|(token, _)| find_bytes(text, token).is_some())
        .map(|(_, state)| *state)
}
