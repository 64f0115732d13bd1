use core::future::Future;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};

use crate::{
    at_command::{Answer, AtRequest, CallOk, Dial, DialTarget, HangUp, Redial},
    log, Error, ModemPower, Sim900, Transport,
};

/// Voice calls.
pub trait Call {
    /// Pick up an incoming call.
    fn answer(&mut self) -> impl Future<Output = Result<(), Error>>;

    fn call_number(&mut self, number: &str) -> impl Future<Output = Result<(), Error>>;

    /// Call the number stored at `position` in the current phonebook.
    fn call_from_phonebook(&mut self, position: u16) -> impl Future<Output = Result<(), Error>>;

    /// Call the first phonebook entry whose name matches `entry`.
    fn call_by_phonebook_match(&mut self, entry: &str) -> impl Future<Output = Result<(), Error>>;

    /// Call the last dialed number again.
    fn redial(&mut self) -> impl Future<Output = Result<(), Error>>;

    /// Hang up.
    fn disconnect(&mut self) -> impl Future<Output = Result<(), Error>>;
}

/// [Call] on a SIM900.
pub struct CallSim900<'d, M: RawMutex, T: Transport, P: ModemPower> {
    modem: &'d Mutex<M, Sim900<T, P>>,
}

impl<'d, M: RawMutex, T: Transport, P: ModemPower> CallSim900<'d, M, T, P> {
    pub fn new(modem: &'d Mutex<M, Sim900<T, P>>) -> Self {
        CallSim900 { modem }
    }

    /// Run a request that sets up a call.
    async fn call<R: AtRequest<Response = CallOk>>(&mut self, request: R) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        let timeout = modem.config().connect_timeout;
        modem.commands().run_with_timeout(timeout, request).await?;
        Ok(())
    }
}

impl<M: RawMutex, T: Transport, P: ModemPower> Call for CallSim900<'_, M, T, P> {
    async fn answer(&mut self) -> Result<(), Error> {
        log::info!("answering call");
        self.call(Answer).await
    }

    async fn call_number(&mut self, number: &str) -> Result<(), Error> {
        log::info!("calling {}", number);
        self.call(Dial(DialTarget::Number(number))).await
    }

    async fn call_from_phonebook(&mut self, position: u16) -> Result<(), Error> {
        self.call(Dial(DialTarget::PhonebookPosition(position)))
            .await
    }

    async fn call_by_phonebook_match(&mut self, entry: &str) -> Result<(), Error> {
        self.call(Dial(DialTarget::PhonebookEntry(entry))).await
    }

    async fn redial(&mut self) -> Result<(), Error> {
        self.call(Redial).await
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem.commands().run(HangUp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at_command::{CallError, SimError};
    use crate::test::{shared_modem, MockSerial};
    use futures::executor::block_on;

    #[test]
    fn dial() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .expect_write(b"ATD0701234567;\r\n")
                    .reply(b"\r\nOK\r\n")
                    .expect_write(b"ATD>12;\r\n")
                    .reply(b"\r\nOK\r\n")
                    .expect_write(b"ATD>\"Home\";\r\n")
                    .reply(b"\r\nOK\r\n")
                    .expect_write(b"ATDL\r\n")
                    .reply(b"\r\nOK\r\n")
                    .expect_write(b"ATH\r\n")
                    .reply(b"\r\nOK\r\n")
                    .finalize(),
            );
            let mut call = CallSim900::new(&modem);

            assert_eq!(call.call_number("0701234567").await, Ok(()));
            assert_eq!(call.call_from_phonebook(12).await, Ok(()));
            assert_eq!(call.call_by_phonebook_match("Home").await, Ok(()));
            assert_eq!(call.redial().await, Ok(()));
            assert_eq!(call.disconnect().await, Ok(()));
        })
    }

    #[test]
    fn call_failures() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .reply_after(100, b"\r\nBUSY\r\n")
                    .reply_after(100, b"\r\nNO CARRIER\r\n")
                    .reply_after(100, b"\r\nNO DIALTONE\r\n")
                    .reply_after(100, b"\r\n+CME ERROR: 30\r\n")
                    .finalize(),
            );
            let mut call = CallSim900::new(&modem);

            assert_eq!(
                call.call_number("112").await,
                Err(Error::Call(CallError::Busy))
            );
            assert_eq!(call.answer().await, Err(Error::Call(CallError::NoCarrier)));
            assert_eq!(call.redial().await, Err(Error::Call(CallError::NoDialtone)));
            assert_eq!(
                call.call_number("112").await,
                Err(Error::Sim(SimError::CmeErr { code: 30 }))
            );
        })
    }

    #[test]
    fn result_code_after_echo() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .expect_write(b"ATD112;\r\n")
                    .reply(b"ATD112;\r")
                    .reply_after(200, b"\r\nOK\r\n")
                    .expect_write(b"ATA\r\n")
                    .reply(b"ATA\r")
                    .reply_after(200, b"\r\nNO CARRIER\r\n")
                    .finalize(),
            );
            let mut call = CallSim900::new(&modem);

            assert_eq!(call.call_number("112").await, Ok(()));
            assert_eq!(call.answer().await, Err(Error::Call(CallError::NoCarrier)));
        })
    }

    #[test]
    fn answer_data_call() {
        block_on(async {
            let modem = shared_modem(
                MockSerial::build()
                    .expect_write(b"ATA\r\n")
                    .reply(b"\r\nCONNECT 9600\r\n")
                    .finalize(),
            );
            let mut call = CallSim900::new(&modem);
            assert_eq!(call.answer().await, Ok(()));
        })
    }
}
