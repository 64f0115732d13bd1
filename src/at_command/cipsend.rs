use super::{format_command, AtParseErr, AtParseLine, AtRequest, CommandText, GenericOk};
use crate::{find_bytes, Error};

/// Most bytes a single AT+CIPSEND accepts.
pub const MAX_SEND_LEN: usize = 1460;

/// AT+CIPSEND=...
///
/// The modem answers with a `> ` prompt, after which exactly `len` bytes of payload are
/// expected.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IpSend {
    /// Connection id in Multi-IP mode
    pub connection: Option<u8>,
    pub len: usize,
}

impl AtRequest for IpSend {
    // The prompt is not a complete response, see `Gprs::send`.
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        if self.len == 0 || self.len > MAX_SEND_LEN {
            return Err(Error::PayloadTooLarge);
        }

        match self.connection {
            Some(id) => format_command(format_args!("AT+CIPSEND={id},{}", self.len)),
            None => format_command(format_args!("AT+CIPSEND={}", self.len)),
        }
    }
}

/// `SEND OK` / `SEND FAIL`, prefixed with `<n>, ` in Multi-IP mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendResult {
    Ok,
    Fail,
}

impl AtParseLine for SendResult {
    fn from_line(line: &[u8]) -> Result<Self, AtParseErr> {
        if find_bytes(line, b"SEND OK").is_some() {
            Ok(SendResult::Ok)
        } else if find_bytes(line, b"SEND FAIL").is_some() {
            Ok(SendResult::Fail)
        } else {
            Err("Not a send result".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let cmd = IpSend {
            connection: None,
            len: 5,
        };
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CIPSEND=5");

        let cmd = IpSend {
            connection: Some(1),
            len: MAX_SEND_LEN,
        };
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CIPSEND=1,1460");

        let cmd = IpSend {
            connection: None,
            len: MAX_SEND_LEN + 1,
        };
        assert_eq!(cmd.encode(), Err(Error::PayloadTooLarge));
    }

    #[test]
    fn results() {
        assert_eq!(SendResult::from_line(b"SEND OK").unwrap(), SendResult::Ok);
        assert_eq!(SendResult::from_line(b"0, SEND FAIL").unwrap(), SendResult::Fail);
        assert_eq!(SendResult::from_line(b"SEND OK\x80").unwrap(), SendResult::Ok);
        assert!(SendResult::from_line(b"SEND").is_err());
    }
}
