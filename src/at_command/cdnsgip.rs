use super::{
    format_command, parse_ip, parse_number, AtParseErr, AtParseLine, AtRequest, CommandText,
    GenericOk,
};
use crate::{find_bytes, Error};

/// AT+CDNSGIP=...
///
/// The modem acknowledges with `OK` and later reports the result as `+CDNSGIP: ...`.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolveName<'a>(pub &'a str);

impl AtRequest for ResolveName<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CDNSGIP=\"{}\"", self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DnsError {
    NetworkError,
    CommonError,
    Other(u8),
}

impl From<u8> for DnsError {
    fn from(code: u8) -> Self {
        match code {
            3 => DnsError::NetworkError,
            8 => DnsError::CommonError,
            other => DnsError::Other(other),
        }
    }
}

/// A `+CDNSGIP: ` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DnsResult {
    /// The first address the name resolved to.
    Resolved([u8; 4]),
    Failed(DnsError),
}

impl AtParseLine for DnsResult {
    fn from_line(line: &[u8]) -> Result<Self, AtParseErr> {
        let rest = line
            .strip_prefix(b"+CDNSGIP: ")
            .ok_or("Missing '+CDNSGIP: ' prefix")?;

        if let Some(code) = rest.strip_prefix(b"0,") {
            return Ok(DnsResult::Failed(parse_number::<u8>(code)?.into()));
        }

        let rest = rest.strip_prefix(b"1,").ok_or("Unknown +CDNSGIP result")?;

        // 1,"<name>","<ip>"[,"<ip2>"]
        let start = find_bytes(rest, b"\",\"").ok_or("Missing address")? + 3;
        let address = &rest[start..];
        let end = address
            .iter()
            .position(|b| *b == b'"')
            .unwrap_or(address.len());

        parse_ip(&address[..end])
            .address()
            .map(DnsResult::Resolved)
            .ok_or_else(|| "Invalid address".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved() {
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 1,\"www.google.com\",\"142.250.74.36\"").unwrap(),
            DnsResult::Resolved([142, 250, 74, 36])
        );
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 1,\"a.se\",\"1.2.3.4\",\"5.6.7.8\"").unwrap(),
            DnsResult::Resolved([1, 2, 3, 4])
        );
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 1,\"a.se\",\"1.2.3.4\"\xfe").unwrap(),
            DnsResult::Resolved([1, 2, 3, 4])
        );
    }

    #[test]
    fn failed() {
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 0,8").unwrap(),
            DnsResult::Failed(DnsError::CommonError)
        );
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 0,3").unwrap(),
            DnsResult::Failed(DnsError::NetworkError)
        );
        assert_eq!(
            DnsResult::from_line(b"+CDNSGIP: 0,11").unwrap(),
            DnsResult::Failed(DnsError::Other(11))
        );
        assert!(DnsResult::from_line(b"+CDNSGIP: 1,\"a.se\"").is_err());
        assert!(DnsResult::from_line(b"+CIFSR").is_err());
    }
}
