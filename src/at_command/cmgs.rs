use super::{
    format_command, parse_number, AtParseErr, AtParseLine, AtRequest, CommandText, GenericOk,
};
use crate::Error;

/// Ends the message text written after the `> ` prompt (Ctrl-Z).
pub const SMS_TERMINATOR: u8 = 0x1A;

/// AT+CMGS=...
///
/// The modem answers with a `> ` prompt, after which the message text and [SMS_TERMINATOR] are
/// expected.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendSms<'a> {
    pub destination: &'a str,
}

impl AtRequest for SendSms<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CMGS=\"{}\"", self.destination))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageReference {
    pub value: u8,
}

impl AtParseLine for MessageReference {
    fn from_line(line: &[u8]) -> Result<Self, AtParseErr> {
        let rest = line
            .strip_prefix(b"+CMGS: ")
            .ok_or("Missing '+CMGS: ' prefix")?;

        Ok(Self {
            value: parse_number(rest).map_err(|_| "Invalid message reference")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference() {
        assert_eq!(
            MessageReference::from_line(b"+CMGS: 42").unwrap(),
            MessageReference { value: 42 }
        );
        assert!(MessageReference::from_line(b"+CMGS: 256").is_err());
        assert!(MessageReference::from_line(b"+CMGR: 1").is_err());
    }
}
