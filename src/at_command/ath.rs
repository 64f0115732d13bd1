use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// Which calls `ATH` hangs up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DisconnectParameter {
    /// Every call on the channel the command was sent on, GPRS included.
    AllOnChannel = 0,
    AllChannels = 1,
    CsdOnChannel = 2,
    GprsOnChannel = 3,

    /// Active speech and data calls, but not waiting ones.
    CsOnChannel = 4,
    Waiting = 5,
}

/// ATH<n>
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Disconnect(pub DisconnectParameter);

/// ATH
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HangUp;

impl AtRequest for HangUp {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATH"))
    }
}

impl AtRequest for Disconnect {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATH{}", self.0 as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let cmd = Disconnect(DisconnectParameter::Waiting).encode().unwrap();
        assert_eq!(cmd.as_str(), "ATH5");
        let cmd = Disconnect(DisconnectParameter::AllOnChannel).encode().unwrap();
        assert_eq!(cmd.as_str(), "ATH0");
    }
}
