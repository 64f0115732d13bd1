use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// ATE1 / ATE0
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetEcho(pub bool);

impl AtRequest for SetEcho {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATE{}", self.0 as u8))
    }
}
