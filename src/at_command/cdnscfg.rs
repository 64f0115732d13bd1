use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// AT+CDNSCFG=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigureDns<'a> {
    pub primary: &'a str,
    pub secondary: Option<&'a str>,
}

impl AtRequest for ConfigureDns<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        match self.secondary {
            Some(secondary) => format_command(format_args!(
                "AT+CDNSCFG=\"{}\",\"{}\"",
                self.primary, secondary
            )),
            None => format_command(format_args!("AT+CDNSCFG=\"{}\"", self.primary)),
        }
    }
}
