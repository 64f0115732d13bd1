use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectMode {
    Tcp,
    Udp,
}

impl ConnectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectMode::Tcp => "TCP",
            ConnectMode::Udp => "UDP",
        }
    }
}

/// AT+CIPSTART=...
///
/// `OK` only means the command was accepted, the outcome follows as `CONNECT OK` or
/// `CONNECT FAIL`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connect<'a> {
    /// Which connection slot to use (Multi-IP mode)
    pub connection: Option<u8>,

    /// TCP or UDP
    pub mode: ConnectMode,

    /// IP or domain name
    pub destination: &'a str,

    pub port: u16,
}

impl AtRequest for Connect<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        let mode = self.mode.as_str();
        match self.connection {
            Some(id) => format_command(format_args!(
                "AT+CIPSTART={id},\"{mode}\",\"{}\",\"{}\"",
                self.destination, self.port
            )),
            None => format_command(format_args!(
                "AT+CIPSTART=\"{mode}\",\"{}\",\"{}\"",
                self.destination, self.port
            )),
        }
    }
}
