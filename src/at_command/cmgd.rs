use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// Which messages AT+CMGD removes, besides the one at the given index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DeleteFlag {
    /// Only the message at the index.
    Index = 0,
    Read = 1,
    ReadAndSent = 2,
    ReadAndSentUnsent = 3,
    All = 4,
}

/// AT+CMGD=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeleteSms {
    pub index: u16,
    pub flag: DeleteFlag,
}

impl AtRequest for DeleteSms {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("AT+CMGD={},{}", self.index, self.flag as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let cmd = DeleteSms {
            index: 7,
            flag: DeleteFlag::Index,
        };
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CMGD=7,0");
        let cmd = DeleteSms {
            index: 1,
            flag: DeleteFlag::All,
        };
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CMGD=1,4");
    }
}
