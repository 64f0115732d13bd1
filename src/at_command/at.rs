use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// AT
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct At;

impl AtRequest for At {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT"))
    }
}
