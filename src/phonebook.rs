use core::future::Future;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};

use crate::{
    at_command::{FindPhonebookEntries, SetAutoAnswer},
    Error, ModemPower, Sim900, Transport,
};

/// The phonebook on the SIM card, and call settings tied to it.
pub trait Phonebook {
    /// Count the entries whose name starts with `text`.
    fn find_entries(&mut self, text: &str) -> impl Future<Output = Result<usize, Error>>;

    /// Answer incoming calls after `rings` rings, or never if `rings` is 0.
    fn set_automatic_answering(&mut self, rings: u8) -> impl Future<Output = Result<(), Error>>;
}

/// [Phonebook] on a SIM900.
pub struct PhonebookSim900<'d, M: RawMutex, T: Transport, P: ModemPower> {
    modem: &'d Mutex<M, Sim900<T, P>>,
}

impl<'d, M: RawMutex, T: Transport, P: ModemPower> PhonebookSim900<'d, M, T, P> {
    pub fn new(modem: &'d Mutex<M, Sim900<T, P>>) -> Self {
        PhonebookSim900 { modem }
    }
}

impl<M: RawMutex, T: Transport, P: ModemPower> Phonebook for PhonebookSim900<'_, M, T, P> {
    async fn find_entries(&mut self, text: &str) -> Result<usize, Error> {
        let mut modem = self.modem.lock().await;
        let matches = modem.commands().run(FindPhonebookEntries(text)).await?;
        Ok(matches.0)
    }

    async fn set_automatic_answering(&mut self, rings: u8) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem.commands().run(SetAutoAnswer(rings)).await?;
        Ok(())
    }
}
