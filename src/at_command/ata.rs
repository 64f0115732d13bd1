use super::{format_command, AtRequest, CallOk, CommandText};
use crate::Error;

/// ATA
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Answer;

impl AtRequest for Answer {
    type Response = CallOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATA"))
    }
}
