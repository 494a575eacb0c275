mod base;
mod interface;
mod printer;

pub use base::{ParseError, Registry};
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub(crate) use printer::Printer;

#[cfg(test)]
pub(crate) use interface::util;
