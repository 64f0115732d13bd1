use super::{
    format_command,
    generic_response::{has_final_result, lines},
    AtRequest, AtResponse, CommandText, SimError,
};
use crate::Error;

/// AT+CIFSR
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GetLocalIp;

/// The address the network assigned to the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalIp(pub [u8; 4]);

impl AtRequest for GetLocalIp {
    type Response = LocalIp;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CIFSR"))
    }
}

impl AtResponse for LocalIp {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        let parsed = parse_ip(response);
        match parsed.address() {
            Some(address) => Ok(LocalIp(address)),
            None => match SimError::parse(response) {
                Some(error) => Err(Error::Sim(error)),
                None => Err(Error::InvalidIp),
            },
        }
    }

    // The address line is all the modem sends, there is no `OK` after it.
    fn is_complete(response: &[u8]) -> bool {
        lines(response).any(|line| parse_ip(line).address().is_some())
            || has_final_result(response, &[])
    }
}

/// The dotted-quad groups found by [parse_ip].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedIp {
    pub octets: [u8; 4],

    /// How many of `octets` were filled in.
    pub count: usize,
}

impl ParsedIp {
    pub fn address(&self) -> Option<[u8; 4]> {
        (self.count == 4).then_some(self.octets)
    }
}

/// Store a finished group, returning whether scanning should go on.
fn complete(parsed: &mut ParsedIp, value: u16) -> bool {
    match u8::try_from(value) {
        Ok(octet) => {
            parsed.octets[parsed.count] = octet;
            parsed.count += 1;
            parsed.count < 4
        }
        Err(_) => false,
    }
}

/// Pick a dotted-quad address out of free-form text.
///
/// Digits accumulate into the current group, of which only the first three count. A `.` ends
/// the group if it has any digits, as does the end of the input. Everything else is skipped.
/// Scanning stops after four groups, or at a group above 255, which is not counted.
pub fn parse_ip(bytes: &[u8]) -> ParsedIp {
    let mut parsed = ParsedIp::default();
    let mut value: u16 = 0;
    let mut digits = 0;

    for &b in bytes {
        match b {
            b'0'..=b'9' => {
                if digits < 3 {
                    value = value * 10 + u16::from(b - b'0');
                }
                digits += 1;
            }
            b'.' if digits > 0 => {
                if !complete(&mut parsed, value) {
                    return parsed;
                }
                value = 0;
                digits = 0;
            }
            _ => {}
        }
    }

    if digits > 0 {
        complete(&mut parsed, value);
    }

    parsed
}
