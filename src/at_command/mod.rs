use core::{
    fmt::{Arguments, Debug, Write},
    num::ParseIntError,
    str::{from_utf8, FromStr},
};

use heapless::String;

use crate::Error;

pub mod generic_response;

pub mod at;
pub mod ata;
pub mod atd;
pub mod ate;
pub mod ath;
pub mod ats0;
pub mod cdnscfg;
pub mod cdnsgip;
pub mod cifsr;
pub mod ciicr;
pub mod cipack;
pub mod cipclose;
pub mod cipmux;
pub mod cipsend;
pub mod cipserver;
pub mod cipshut;
pub mod cipstart;
pub mod cipstatus;
pub mod cmgd;
pub mod cmgf;
pub mod cmgs;
pub mod cpbf;
pub mod cstt;

pub use generic_response::{CallError, CallOk, CloseOk, GenericOk, ShutOk, SimError};

pub use at::At;
pub use ata::Answer;
pub use atd::{Dial, DialTarget, Redial};
pub use ate::SetEcho;
pub use ath::{Disconnect, DisconnectParameter, HangUp};
pub use ats0::SetAutoAnswer;
pub use cdnscfg::ConfigureDns;
pub use cdnsgip::{DnsError, DnsResult, ResolveName};
pub use cifsr::{parse_ip, GetLocalIp, LocalIp, ParsedIp};
pub use ciicr::StartGprs;
pub use cipack::{QueryTransmittingState, TransmittingState};
pub use cipclose::CloseConnection;
pub use cipmux::EnableMultiIpConnection;
pub use cipsend::{IpSend, SendResult, MAX_SEND_LEN};
pub use cipserver::{ConfigureServer, ServerMode};
pub use cipshut::ShutConnections;
pub use cipstart::{Connect, ConnectMode};
pub use cipstatus::{ClientState, ConnectionState, GetClientStatus, GetConnectionStatus};
pub use cmgd::{DeleteFlag, DeleteSms};
pub use cmgf::{MessageFormat, SetMessageFormat};
pub use cmgs::{MessageReference, SendSms, SMS_TERMINATOR};
pub use cpbf::{FindPhonebookEntries, PhonebookMatches};
pub use cstt::StartTask;

/// Maximum length of an encoded command, `AT` prefix included.
pub const MAX_COMMAND_LEN: usize = 256;

pub type CommandText = String<MAX_COMMAND_LEN>;

#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct AtParseErr {
    #[allow(dead_code)]
    message: &'static str,
}

/// Parses a single line of a response, without its line terminator.
///
/// Lines are raw bytes off the serial line, which may be garbled.
pub(crate) trait AtParseLine: Sized {
    fn from_line(line: &[u8]) -> Result<Self, AtParseErr>;
}

#[cfg(feature = "defmt")]
pub trait AtRequest: Debug + defmt::Format {
    type Response: AtResponse;

    /// The full command line, `AT` included, without the line terminator.
    fn encode(&self) -> Result<CommandText, Error>;
}

#[cfg(not(feature = "defmt"))]
pub trait AtRequest: Debug {
    type Response: AtResponse;

    /// The full command line, `AT` included, without the line terminator.
    fn encode(&self) -> Result<CommandText, Error>;
}

/// Interprets everything the modem said in reply to a request.
pub trait AtResponse: Sized {
    /// `response` holds the bytes of the read cycle that followed the request, and is never
    /// empty.
    fn from_response(response: &[u8]) -> Result<Self, Error>;

    /// Whether `response` holds the whole reply, or the modem still has more to say.
    ///
    /// By default a reply is complete once it has a final result code on a line of its own.
    fn is_complete(response: &[u8]) -> bool {
        generic_response::has_final_result(response, &[])
    }
}

pub(crate) fn format_command(args: Arguments<'_>) -> Result<CommandText, Error> {
    let mut buf = CommandText::new();
    buf.write_fmt(args).map_err(|_| Error::CommandTooLong)?;
    Ok(buf)
}

/// Parse the number at the start of `field`, after any spaces. Whatever follows the digits is
/// ignored.
pub(crate) fn parse_number<N>(field: &[u8]) -> Result<N, AtParseErr>
where
    N: FromStr<Err = ParseIntError>,
{
    let start = field
        .iter()
        .position(|b| *b != b' ')
        .unwrap_or(field.len());
    let digits = field[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    let number = from_utf8(&field[start..start + digits]).map_err(|_| "Invalid digits")?;
    Ok(number.parse()?)
}

impl From<&'static str> for AtParseErr {
    fn from(message: &'static str) -> Self {
        AtParseErr { message }
    }
}

impl From<ParseIntError> for AtParseErr {
    fn from(_: ParseIntError) -> Self {
        AtParseErr {
            message: "Failed to parse integer",
        }
    }
}

impl From<AtParseErr> for Error {
    fn from(err: AtParseErr) -> Self {
        crate::log::warn!("failed to parse response: {}", err.message);
        Error::UnexpectedResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Raw<'a>(&'a str);

    impl AtRequest for Raw<'_> {
        type Response = GenericOk;
        fn encode(&self) -> Result<CommandText, Error> {
            format_command(format_args!("AT{}", self.0))
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number::<u32>(b"120").unwrap(), 120);
        assert_eq!(parse_number::<u32>(b" 7\xfe").unwrap(), 7);
        assert!(parse_number::<u32>(b"").is_err());
        assert!(parse_number::<u32>(b"a1").is_err());
        assert!(parse_number::<u8>(b"256").is_err());
    }

    #[test]
    fn overlong_command() {
        let text = [b'X'; 300];
        let text = core::str::from_utf8(&text).unwrap();
        assert_eq!(Raw(text).encode(), Err(Error::CommandTooLong));
        assert_eq!(Raw(&text[..254]).encode().unwrap().len(), MAX_COMMAND_LEN);
    }
}
