use super::AtResponse;
use crate::{find_bytes, Error};

/// `OK`
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenericOk;

/// `SHUT OK`, the reply to AT+CIPSHUT
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShutOk;

/// `CLOSE OK`, the reply to AT+CIPCLOSE
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CloseOk;

/// `OK` or `CONNECT` in reply to a call being set up or answered.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallOk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimError {
    /// Generic error
    Generic,

    /// Error relating to mobile equipment or to the network.
    CmeErr { code: u32 },

    /// Error relating to message service or to the network.
    CmsErr { code: u32 },
}

/// Final result codes of a call that did not connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallError {
    NoDialtone,
    Busy,
    NoCarrier,
    NoAnswer,
}

impl SimError {
    /// Find an error result code anywhere in `response`.
    pub fn parse(response: &[u8]) -> Option<SimError> {
        if let Some(code) = code_after(response, b"+CME ERROR: ") {
            Some(SimError::CmeErr { code })
        } else if let Some(code) = code_after(response, b"+CMS ERROR: ") {
            Some(SimError::CmsErr { code })
        } else if find_bytes(response, b"ERROR").is_some() {
            Some(SimError::Generic)
        } else {
            None
        }
    }
}

fn code_after(response: &[u8], marker: &[u8]) -> Option<u32> {
    let start = find_bytes(response, marker)? + marker.len();
    let digits = response[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    core::str::from_utf8(&response[start..start + digits])
        .ok()?
        .parse()
        .ok()
}

impl CallError {
    pub fn parse(response: &[u8]) -> Option<CallError> {
        [
            (&b"NO DIALTONE"[..], CallError::NoDialtone),
            (&b"BUSY"[..], CallError::Busy),
            (&b"NO CARRIER"[..], CallError::NoCarrier),
            (&b"NO ANSWER"[..], CallError::NoAnswer),
        ]
        .into_iter()
        .find(|(token, _)| find_bytes(response, token).is_some())
        .map(|(_, error)| error)
    }
}

/// Succeed if `token` occurs in `response`, otherwise explain why it didn't.
pub(crate) fn expect_token(response: &[u8], token: &str) -> Result<(), Error> {
    if find_bytes(response, token.as_bytes()).is_some() {
        Ok(())
    } else if let Some(error) = SimError::parse(response) {
        Err(Error::Sim(error))
    } else {
        Err(Error::UnexpectedResponse)
    }
}

/// Result codes that end a call attempt.
const CALL_RESULTS: [&[u8]; 5] = [
    b"CONNECT",
    b"NO DIALTONE",
    b"BUSY",
    b"NO CARRIER",
    b"NO ANSWER",
];

/// The complete lines of `response`, without their terminators.
pub(crate) fn lines(response: &[u8]) -> impl Iterator<Item = &[u8]> {
    let complete = response
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |end| end + 1);

    response[..complete]
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Whether a complete line of `response` is a final result code, or contains one of `tokens`.
pub(crate) fn has_final_result(response: &[u8], tokens: &[&[u8]]) -> bool {
    lines(response).any(|line| {
        line == b"OK"
            || line == b"ERROR"
            || line.starts_with(b"+CME ERROR:")
            || line.starts_with(b"+CMS ERROR:")
            || tokens.iter().any(|token| find_bytes(line, token).is_some())
    })
}

/// The error to report when the modem never sent the reply we waited for.
pub(crate) fn missing_reply(response: &[u8]) -> Error {
    match SimError::parse(response) {
        Some(error) => Error::Sim(error),
        None => Error::Timeout,
    }
}

impl AtResponse for GenericOk {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        expect_token(response, "OK").map(|_| GenericOk)
    }
}

impl AtResponse for ShutOk {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        expect_token(response, "SHUT OK").map(|_| ShutOk)
    }

    fn is_complete(response: &[u8]) -> bool {
        has_final_result(response, &[&b"SHUT OK"[..]])
    }
}

impl AtResponse for CloseOk {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        expect_token(response, "CLOSE OK").map(|_| CloseOk)
    }

    fn is_complete(response: &[u8]) -> bool {
        has_final_result(response, &[&b"CLOSE OK"[..]])
    }
}

impl AtResponse for CallOk {
    fn from_response(response: &[u8]) -> Result<Self, Error> {
        if let Some(error) = CallError::parse(response) {
            return Err(Error::Call(error));
        }

        if find_bytes(response, b"CONNECT").is_some() {
            return Ok(CallOk);
        }

        expect_token(response, "OK").map(|_| CallOk)
    }

    fn is_complete(response: &[u8]) -> bool {
        has_final_result(response, &CALL_RESULTS)
    }
}
