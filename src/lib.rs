//! `declarg` is a declarative command line flag parser for Rust.
//!
//! Heavier command line crates solve flag parsing alongside type conversion,
//! sub-commands, and shell integration.
//! `declarg` deliberately covers a narrower contract:
//! * *Declarative registration*:
//! A program states its flags up front — name, short form, long form, whether
//! a value is expected, whether it is mandatory — and then parses once.
//! * *Strings in, strings out*:
//! Bound values are returned as strings; converting them is the caller's
//! business.
//! * *Explicit termination behavior*:
//! When a required flag is missing (or `--help` is requested), the registry
//! either terminates the process with a diagnostic or hands back a structured
//! error, selected via [`TerminationPolicy`].
//! The parse algorithm itself never touches the process lifecycle.
//!
//! # Usage
//! ```
//! use declarg::{Flag, Registry, TerminationPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Registry::from_args(["tool", "-f", "notes.txt", "-v"])
//!     .arg(
//!         Flag::with_name("file")?
//!             .expects_value()
//!             .required()
//!             .help("The file to operate on."),
//!     )
//!     .arg(Flag::with_name("verbose")?.help("Explain what is being done."))
//!     .termination_policy(TerminationPolicy::RaiseError)
//!     .parse()?;
//!
//! assert_eq!(args.get("file"), Some("notes.txt"));
//! assert!(args.is_given("verbose"));
//! # Ok(())
//! # }
//! ```
//!
//! On the command line, the same program behaves like so:
//! ```console
//! $ tool -h
//! usage: tool [-h] -f FILE [-v]
//! options:
//!  -h, --help            Show this help message and exit.
//!  -f FILE, --file FILE  The file to operate on.
//!  -v, --verbose         Explain what is being done.
//!
//! $ tool --file notes.txt
//! $ tool
//! Error: Missing required value for flag 'file'
//! ```
//!
//! # Token Semantics
//! `declarg` walks the raw argument vector (minus the program name) and
//! classifies every token:
//! * `--NAME` matches the long form of a registered flag; `-N` matches the
//! short form.
//! Only the character immediately following the dash is consulted, so there
//! are no combined short clusters.
//! * A matched flag that expects a value binds the *next* raw token, verbatim.
//! If no next token exists the value simply stays absent; the required-flag
//! check decides later whether that matters.
//! * A matched flag that does not expect a value is an *option*: its presence
//! alone is the signal, observable through [`Registry::is_given`].
//! * `--help` and `-h` are reserved and pre-empt everything else, including
//! the required-flag check.
//! * Any other token is positional, and positional tokens are ignored — they
//! are never bound to a flag.
//!
//! Malformed tokens (a bare `-`, an empty `--`) are skipped without error.
#![deny(missing_docs)]
mod constant;
mod flag;
mod model;
mod parser;

pub use flag::{Flag, InvalidDefinition};
pub use model::TerminationPolicy;
pub use parser::{ParseError, Registry};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
