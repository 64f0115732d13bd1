#![cfg_attr(not(test), no_std)]
#![allow(clippy::unnecessary_lazy_evaluations)]
#![allow(clippy::single_component_path_imports)]

pub mod at_command;
pub mod call;
mod error;
pub mod gprs;
pub mod modem;
pub mod phonebook;
pub mod read;
pub mod sms;
mod util;

pub use util::*;

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("'log' and 'defmt' features are mutually exclusive");
#[cfg(not(any(feature = "log", feature = "defmt")))]
compile_error!("please enable a logging feature, e.g. 'log' or 'defmt'");
#[cfg(feature = "defmt")]
pub(crate) use defmt as log;
use embedded_io_async::{Read, ReadReady, Write};
#[cfg(feature = "log")]
pub(crate) use log;

pub use call::{Call, CallSim900};
pub use error::Error;
pub use gprs::{Connection, Gprs, GprsSim900};
pub use modem::{
    power::{NoPowerControl, PowerPins},
    Command, CommandEngine, ModemConfig, SessionState, Sim900, AT_DEFAULT_TIMEOUT,
};
pub use phonebook::{Phonebook, PhonebookSim900};
pub use sms::{Sms, SmsSim900};

use core::future::Future;

/// The serial link between the microcontroller and the modem.
///
/// The purpose of the trait is to let the user of this library plug in the UART driver type from
/// whatever HAL they're using. Reading must return as soon as *some* bytes are available, and
/// [ReadReady::read_ready] must report whether a read would complete without waiting. The
/// command engine relies on both to tell a finished response from a truncated one.
pub trait Transport: Read + Write + ReadReady {
    /// Open the link at the given baud rate.
    ///
    /// Many HALs fix the baud rate when the UART is constructed, in which case the default
    /// implementation, which does nothing, is sufficient.
    fn configure(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
        let _ = baud_rate;
        Ok(())
    }
}

pub trait ModemPower {
    /// Pulse the modem power key, switching the modem on if it is off and off if it is on.
    fn toggle_power(&mut self) -> impl Future<Output = ()>;

    /// Reset the modem, e.g. by pulsing the modem reset pin.
    fn reset(&mut self) -> impl Future<Output = ()>;
}
