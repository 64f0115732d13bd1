use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServerMode {
    Listen { port: u16 },
    Close,
}

impl ServerMode {
    /// What the modem reports once the mode is in effect.
    pub fn confirmation(&self) -> &'static str {
        match self {
            ServerMode::Listen { .. } => "SERVER OK",
            ServerMode::Close => "SERVER CLOSE",
        }
    }
}

/// AT+CIPSERVER=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigureServer(pub ServerMode);

impl AtRequest for ConfigureServer {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        match self.0 {
            ServerMode::Listen { port } => format_command(format_args!("AT+CIPSERVER=1,{port}")),
            ServerMode::Close => format_command(format_args!("AT+CIPSERVER=0")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let cmd = ConfigureServer(ServerMode::Listen { port: 8080 });
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CIPSERVER=1,8080");
        let cmd = ConfigureServer(ServerMode::Close);
        assert_eq!(cmd.encode().unwrap().as_str(), "AT+CIPSERVER=0");
    }
}
