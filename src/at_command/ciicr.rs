use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// AT+CIICR
///
/// Brings up the wireless connection. The modem may take up to 85 seconds to answer.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartGprs;

impl AtRequest for StartGprs {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIICR"))
    }
}
