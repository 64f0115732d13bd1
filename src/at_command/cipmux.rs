use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// AT+CIPMUX=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnableMultiIpConnection(pub bool);

impl AtRequest for EnableMultiIpConnection {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIPMUX={}", self.0 as u8))
    }
}
