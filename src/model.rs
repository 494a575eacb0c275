use crate::parser::{ParseError, UserInterface};

/// The strategy applied when parsing must stop: a required flag finished the
/// scan unsatisfied, or help was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Emit diagnostics on the error stream and terminate the process:
    /// status `0` after displaying help, status `1` for a missing required
    /// flag.
    #[default]
    ExitProcess,
    /// Hand the structured [`ParseError`] back to the caller and let the
    /// hosting program decide.
    RaiseError,
}

impl TerminationPolicy {
    // The single place this crate touches the process lifecycle.
    pub(crate) fn escalate(
        &self,
        error: ParseError,
        user_interface: &(impl UserInterface + ?Sized),
    ) -> ParseError {
        match self {
            TerminationPolicy::ExitProcess => {
                let status = match error {
                    ParseError::HelpRequested => 0,
                    error @ ParseError::MissingRequiredValue(_) => {
                        user_interface.print_error(error);
                        1
                    }
                };
                std::process::exit(status);
            }
            TerminationPolicy::RaiseError => error,
        }
    }
}
