use super::{format_command, AtRequest, AtResponse, CommandText, SimError};
use crate::{count_bytes, find_bytes, Error};

/// AT+CPBF=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FindPhonebookEntries<'a>(pub &'a str);

/// Number of `+CPBF:` records in the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhonebookMatches(pub usize);

/// +CME ERROR: not found
const NOT_FOUND: u32 = 22;

impl AtRequest for FindPhonebookEntries<'_> {
    type Response = PhonebookMatches;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CPBF=\"{}\"", self.0))
    }
}

impl AtResponse for PhonebookMatches {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        let matches = count_bytes(response, b"+CPBF:");

        if find_bytes(response, b"OK").is_some() {
            return Ok(PhonebookMatches(matches));
        }

        match SimError::parse(response) {
            Some(SimError::CmeErr { code: NOT_FOUND }) => Ok(PhonebookMatches(0)),
            Some(error) => Err(Error::Sim(error)),
            // the final OK did not fit in the buffer
            None if matches > 0 => Ok(PhonebookMatches(matches)),
            None => Err(Error::UnexpectedResponse),
        }
    }
}
