use super::{
    format_command, parse_number, AtParseErr, AtParseLine, AtRequest, CommandText, GenericOk,
};
use crate::{collect_array, Error};

/// AT+CIPACK[=<n>]
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueryTransmittingState {
    /// Connection id in Multi-IP mode
    pub connection: Option<u8>,
}

impl AtRequest for QueryTransmittingState {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        match self.connection {
            Some(id) => format_command(format_args!("AT+CIPACK={id}")),
            None => format_command(format_args!("AT+CIPACK")),
        }
    }
}

/// Byte counters of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmittingState {
    /// Bytes sent
    pub txlen: u32,

    /// Bytes confirmed by the remote end
    pub acklen: u32,

    /// Bytes not yet confirmed
    pub nacklen: u32,
}

impl AtParseLine for TransmittingState {
    fn from_line(line: &[u8]) -> Result<Self, AtParseErr> {
        let rest = line
            .strip_prefix(b"+CIPACK: ")
            .ok_or("Missing '+CIPACK: ' prefix")?;

        let [txlen, acklen, nacklen] =
            collect_array(rest.split(|b| *b == b',')).ok_or("Missing ','")?;

        Ok(TransmittingState {
            txlen: parse_number(txlen)?,
            acklen: parse_number(acklen)?,
            nacklen: parse_number(nacklen)?,
        })
    }
}
