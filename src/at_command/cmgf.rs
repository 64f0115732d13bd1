use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageFormat {
    Pdu = 0,
    Text = 1,
}

/// AT+CMGF=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetMessageFormat(pub MessageFormat);

impl AtRequest for SetMessageFormat {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CMGF={}", self.0 as u8))
    }
}
