use super::{format_command, AtRequest, CallOk, CommandText};
use crate::Error;

/// What number to dial.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialTarget<'a> {
    Number(&'a str),

    /// Position in the current phonebook.
    PhonebookPosition(u16),

    /// First phonebook entry matching the text.
    PhonebookEntry(&'a str),
}

/// ATD...; (voice call)
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dial<'a>(pub DialTarget<'a>);

/// ATDL
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redial;

impl AtRequest for Dial<'_> {
    type Response = CallOk;
    fn encode(&self) -> Result<CommandText, Error> {
        match self.0 {
            DialTarget::Number(number) => format_command(format_args!("ATD{number};")),
            DialTarget::PhonebookPosition(position) => {
                format_command(format_args!("ATD>{position};"))
            }
            DialTarget::PhonebookEntry(entry) => format_command(format_args!("ATD>\"{entry}\";")),
        }
    }
}

impl AtRequest for Redial {
    type Response = CallOk;
    fn encode(&self) -> Result<CommandText, Error> {
        format_command(format_args!("ATDL"))
    }
}
