use super::{format_command, AtRequest, CommandText, ShutOk};
use crate::Error;

/// AT+CIPSHUT
///
/// Deactivates the GPRS PDP context and closes every connection.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShutConnections;

impl AtRequest for ShutConnections {
    type Response = ShutOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIPSHUT"))
    }
}
