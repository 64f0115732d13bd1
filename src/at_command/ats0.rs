use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// ATS0=...
///
/// Number of rings before an incoming call is answered automatically, 0 disables.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetAutoAnswer(pub u8);

impl AtRequest for SetAutoAnswer {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATS0={}", self.0))
    }
}
