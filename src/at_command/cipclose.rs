use super::{format_command, AtRequest, CloseOk, CommandText};
use crate::Error;

/// AT+CIPCLOSE=...
///
/// Always requests a quick close.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CloseConnection {
    /// Connection id in Multi-IP mode
    pub connection: Option<u8>,
}

impl AtRequest for CloseConnection {
    type Response = CloseOk;
    fn encode(&self) -> Result<CommandText, Error> {
        match self.connection {
            Some(id) => format_command(format_args!("AT+CIPCLOSE={id},1")),
            None => format_command(format_args!("AT+CIPCLOSE=1")),
        }
    }
}
