use super::{format_command, AtRequest, CommandText, GenericOk};
use crate::Error;

/// AT+CSTT=...
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartTask<'a> {
    pub apn: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl AtRequest for StartTask<'_> {
    type Response = GenericOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!(
            "AT+CSTT=\"{}\",\"{}\",\"{}\"",
            self.apn, self.username, self.password,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let cmd = StartTask {
            apn: "online.telia.se",
            username: "",
            password: "",
        };
        assert_eq!(
            cmd.encode().unwrap().as_str(),
            "AT+CSTT=\"online.telia.se\",\"\",\"\""
        );
    }
}
