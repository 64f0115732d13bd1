use core::future::Future;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};

use crate::{
    at_command::{
        generic_response::missing_reply, AtParseLine, DeleteFlag, DeleteSms, MessageFormat,
        MessageReference, SendSms, SetMessageFormat, SMS_TERMINATOR,
    },
    log, Error, ModemPower, Sim900, Transport,
};

/// Short messages.
pub trait Sms {
    /// Delete the message at `index`, and more depending on `flag`.
    fn remove(&mut self, index: u16, flag: DeleteFlag) -> impl Future<Output = Result<(), Error>>;

    fn format(&mut self, format: MessageFormat) -> impl Future<Output = Result<(), Error>>;

    /// Send `text` to `number`, returning the message reference. Requires text mode.
    fn send(&mut self, number: &str, text: &str) -> impl Future<Output = Result<u8, Error>>;
}

/// [Sms] on a SIM900.
pub struct SmsSim900<'d, M: RawMutex, T: Transport, P: ModemPower> {
    modem: &'d Mutex<M, Sim900<T, P>>,
}

impl<'d, M: RawMutex, T: Transport, P: ModemPower> SmsSim900<'d, M, T, P> {
    pub fn new(modem: &'d Mutex<M, Sim900<T, P>>) -> Self {
        SmsSim900 { modem }
    }
}

impl<M: RawMutex, T: Transport, P: ModemPower> Sms for SmsSim900<'_, M, T, P> {
    async fn remove(&mut self, index: u16, flag: DeleteFlag) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem.commands().run(DeleteSms { index, flag }).await?;
        Ok(())
    }

    async fn format(&mut self, format: MessageFormat) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem.commands().run(SetMessageFormat(format)).await?;
        Ok(())
    }

    async fn send(&mut self, number: &str, text: &str) -> Result<u8, Error> {
        let mut modem = self.modem.lock().await;
        let config = *modem.config();
        let commands = modem.commands();

        log::info!("sending sms to {}", number);
        commands
            .send_request(&SendSms { destination: number }, config.command_timeout)
            .await?;

        if commands
            .wait_until_receive(">", config.command_timeout)
            .await?
            .is_none()
        {
            return Err(missing_reply(commands.response()));
        }

        commands.clear_response();
        commands.write_str(text).await?;
        commands.write(&[SMS_TERMINATOR]).await?;

        let Some(line) = commands.wait_for_line("+CMGS: ", config.send_timeout).await? else {
            return Err(missing_reply(commands.response()));
        };

        Ok(MessageReference::from_line(line)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at_command::SimError;
    use crate::test::{shared_modem, MockSerial};
    use futures::executor::block_on;

    #[test]
    fn send() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .expect_write(b"AT+CMGS=\"+46701234567\"\r\n")
                    .reply(b"\r\n> ")
                    .expect_write(b"hello there\x1A")
                    .reply_after(150, b"\r\n+CMGS: 17\r\n\r\nOK\r\n")
                    .finalize(),
            );
            let mut sms = SmsSim900::new(&modem);

            assert_eq!(sms.send("+46701234567", "hello there").await, Ok(17));
        })
    }

    #[test]
    fn send_fails() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .reply(b"\r\n> ")
                    .reply_after(100, b"\r\n+CMS ERROR: 38\r\n")
                    .finalize(),
            );
            let mut sms = SmsSim900::new(&modem);

            assert_eq!(
                sms.send("112", "x").await,
                Err(Error::Sim(SimError::CmsErr { code: 38 }))
            );
        })
    }

    #[test]
    fn settings() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .expect_write(b"AT+CMGF=1\r\n")
                    .reply(b"\r\nOK\r\n")
                    .expect_write(b"AT+CMGD=1,4\r\n")
                    .reply(b"\r\nOK\r\n")
                    .finalize(),
            );
            let mut sms = SmsSim900::new(&modem);

            assert_eq!(sms.format(MessageFormat::Text).await, Ok(()));
            assert_eq!(sms.remove(1, DeleteFlag::All).await, Ok(()));
        })
    }
}
