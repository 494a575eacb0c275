use std::env;
use std::path::Path;

use thiserror::Error;

use crate::constant::*;
use crate::flag::Flag;
use crate::model::TerminationPolicy;
use crate::parser::{ConsoleInterface, Printer, UserInterface};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The outcome of a failed [`Registry::parse`].
///
/// Under [`TerminationPolicy::ExitProcess`] these never reach the caller; the
/// process terminates instead.
/// Under [`TerminationPolicy::RaiseError`] they are returned for the hosting
/// program to handle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// One or more required flags finished the scan unsatisfied.
    /// Carries every offending flag name, in registration order.
    #[error("{}", missing_required_lines(.0))]
    MissingRequiredValue(Vec<String>),

    /// `-h`/`--help` was encountered.
    /// The help text has already been displayed; this marks that parsing did
    /// not complete.
    #[error("Help requested.")]
    HelpRequested,
}

fn missing_required_lines(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("Error: Missing required value for flag '{name}'"))
        .collect::<Vec<String>>()
        .join("\n")
}

/// The flag registry and parser.
///
/// A `Registry` is built from a raw argument vector, configured with
/// [`Flag`]s via [`Registry::arg`], and then consumed by a single
/// [`Registry::parse`] call which returns the parsed registry for lookups:
/// ```
/// use declarg::{Flag, Registry};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let args = Registry::from_args(["tool", "--file", "notes.txt"])
///     .arg(Flag::with_name("file")?.expects_value())
///     .parse()?;
///
/// assert_eq!(args.get("file"), Some("notes.txt"));
/// # Ok(())
/// # }
/// ```
///
/// Flag names are expected to be unique within a registry.
/// Uniqueness is not enforced at registration; on duplicates, the
/// first-registered flag wins for every operation.
pub struct Registry {
    tokens: Vec<String>,
    flags: Vec<Flag>,
    policy: TerminationPolicy,
    program: Option<String>,
    version: Option<String>,
    author: Option<String>,
    about: Option<String>,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tokens", &self.tokens)
            .field("flags", &self.flags)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Build a registry from the process argument vector, [`env::args`].
    pub fn from_env() -> Self {
        Self::from_args(env::args())
    }

    /// Build a registry from a raw argument vector.
    ///
    /// The token at index `0` is taken to be the program name: it is dropped
    /// from the token sequence and retained (basename only) as the default
    /// program name for the help message.
    /// Zero tokens is a legal input.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut tokens = args.into_iter().map(|token| token.as_ref().to_string());
        let program = tokens.next().and_then(|first| {
            Path::new(&first)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });

        Self {
            tokens: tokens.collect(),
            flags: Vec::default(),
            policy: TerminationPolicy::default(),
            program,
            version: None,
            author: None,
            about: None,
            user_interface: Box::new(ConsoleInterface::default()),
        }
    }

    #[cfg(test)]
    pub(crate) fn user_interface(mut self, user_interface: Box<dyn UserInterface>) -> Self {
        self.user_interface = user_interface;
        self
    }

    /// Register a flag.
    ///
    /// Registration order is preserved: it determines the help message layout,
    /// the diagnostic order for missing required flags, and which flag wins on
    /// a duplicated name (the first).
    pub fn arg(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Override the program name shown in the help message.
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program.replace(name.into());
        self
    }

    /// Document the program version, shown in the help message.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Document the program author, shown in the help message.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author.replace(author.into());
        self
    }

    /// Document the about message, shown in the help message.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about.replace(about.into());
        self
    }

    /// Select the behavior of the termination path.
    ///
    /// Defaults to [`TerminationPolicy::ExitProcess`].
    pub fn termination_policy(mut self, policy: TerminationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse the raw tokens against the registered flags.
    ///
    /// Walks the token sequence, binding values and given-marks onto the
    /// matching flags, then checks that every required flag was satisfied.
    /// `-h`/`--help` pre-empts the scan: the help message is displayed and the
    /// termination path is taken with [`ParseError::HelpRequested`].
    ///
    /// Consuming `self` is the phase change: the returned registry is the
    /// parsed one, ready for [`Registry::get`] and [`Registry::is_given`].
    /// Parsing the returned registry again re-scans the same tokens without
    /// resetting prior bindings.
    pub fn parse(mut self) -> Result<Self, ParseError> {
        // Single writer: the parse pass owns the registry by move, so flag
        // runtime state cannot be mutated re-entrantly.
        let mut help = false;

        for index in 0..self.tokens.len() {
            let token = self.tokens[index].clone();

            if let Some(name) = token.strip_prefix("--") {
                // A bare '--' carries no name; skip it.
                if name.is_empty() {
                    continue;
                }

                if name == HELP_NAME {
                    help = true;
                    break;
                }

                #[cfg(feature = "tracing_debug")]
                debug!("Long token '--{name}' at index {index}.");

                self.read_long(index, name);
            } else if let Some(rest) = token.strip_prefix('-') {
                // Only the character immediately following the dash is the
                // key; a bare '-' carries none.
                match rest.chars().next() {
                    Some(HELP_SHORT) => {
                        help = true;
                        break;
                    }
                    Some(short) => {
                        #[cfg(feature = "tracing_debug")]
                        debug!("Short token '-{short}' at index {index}.");

                        self.read_short(index, short);
                    }
                    None => {}
                }
            } else {
                // Positional token: not bound to any flag.
                #[cfg(feature = "tracing_debug")]
                debug!("Ignoring positional token at index {index}.");
            }
        }

        if help {
            self.printer().print_help(&*self.user_interface);
            return Err(self
                .policy
                .escalate(ParseError::HelpRequested, &*self.user_interface));
        }

        let missing: Vec<String> = self
            .flags
            .iter()
            .filter(|flag| flag.is_required() && !flag.is_satisfied())
            .map(|flag| flag.name().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(self
                .policy
                .escalate(ParseError::MissingRequiredValue(missing), &*self.user_interface));
        }

        Ok(self)
    }

    fn read_long(&mut self, index: usize, name: &str) {
        // The candidate value is the next raw token; out of range leaves the
        // value absent for the required check to judge.
        let value = self.tokens.get(index + 1).cloned();

        if let Some(flag) = self.flags.iter_mut().find(|flag| flag.long_form() == name) {
            Self::apply(flag, value);
        }
    }

    fn read_short(&mut self, index: usize, short: char) {
        let value = self.tokens.get(index + 1).cloned();

        if let Some(flag) = self
            .flags
            .iter_mut()
            .find(|flag| flag.short_form() == short)
        {
            Self::apply(flag, value);
        }
    }

    fn apply(flag: &mut Flag, value: Option<String>) {
        if flag.is_expecting_value() {
            flag.bind(value);
        }

        if flag.is_option() {
            flag.mark_given();
        }
    }

    fn printer(&self) -> Printer {
        Printer::terminal(
            self.program.as_deref().unwrap_or(DEFAULT_PROGRAM),
            self.version.as_deref(),
            self.author.as_deref(),
            self.about.as_deref(),
            &self.flags,
        )
    }

    /// The bound value of the flag named `name`.
    ///
    /// Returns `None` when the flag is unregistered, or when no value was
    /// bound during the parse.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|flag| flag.name() == name)
            .and_then(|flag| flag.value())
    }

    /// Whether the option named `name` appeared in the parsed tokens.
    ///
    /// This is the boolean-presence query: it is `true` only for option-type
    /// flags.
    /// A value-expecting flag reports `false` here even when satisfied — use
    /// [`Registry::get`] for value presence.
    /// Unregistered names report `false`.
    pub fn is_given(&self, name: &str) -> bool {
        self.flags
            .iter()
            .find(|flag| flag.name() == name)
            .map(|flag| flag.is_option() && flag.is_given())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::channel_interface;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn registry<const N: usize>(tokens: [&str; N]) -> Registry {
        let mut args = vec!["program"];
        args.extend(tokens);
        Registry::from_args(args).termination_policy(TerminationPolicy::RaiseError)
    }

    #[test]
    fn from_args_empty() {
        let registry = Registry::from_args([] as [&str; 0]);

        assert_eq!(registry.tokens, Vec::<String>::default());
        assert_eq!(registry.program, None);
    }

    #[rstest]
    #[case("tool", Some("tool"))]
    #[case("target/debug/tool", Some("tool"))]
    #[case("/usr/bin/tool", Some("tool"))]
    fn from_args_program(#[case] first: &str, #[case] expected: Option<&str>) {
        let registry = Registry::from_args([first, "-v"]);

        assert_eq!(registry.program.as_deref(), expected);
        assert_eq!(registry.tokens, vec!["-v".to_string()]);
    }

    #[rstest]
    #[case(["-n", "John"])]
    #[case(["--name", "John"])]
    fn parse_binds_value(#[case] tokens: [&str; 2]) {
        // Setup
        let registry = registry(tokens)
            .arg(Flag::with_name("name").unwrap().expects_value().required());

        // Execute
        let args = registry.parse().unwrap();

        // Verify
        assert_eq!(args.get("name"), Some("John"));
        // Boolean presence is reserved for option-type flags.
        assert!(!args.is_given("name"));
    }

    #[test]
    fn parse_short_long_equivalence() {
        let by_short = registry(["-n", "John"])
            .arg(Flag::with_name("name").unwrap().expects_value())
            .parse()
            .unwrap();
        let by_long = registry(["--name", "John"])
            .arg(Flag::with_name("name").unwrap().expects_value())
            .parse()
            .unwrap();

        assert_eq!(by_short.get("name"), by_long.get("name"));
    }

    #[test]
    fn parse_options() {
        // Setup
        let registry = registry(["-v", "-c"])
            .arg(Flag::with_name("verbose").unwrap())
            .arg(Flag::with_name("compile").unwrap());

        // Execute
        let args = registry.parse().unwrap();

        // Verify
        assert!(args.is_given("verbose"));
        assert!(args.is_given("compile"));
        assert!(!args.is_given("output"));
        assert_eq!(args.get("output"), None);
    }

    #[test]
    fn parse_option_takes_no_value() {
        let args = registry(["-v", "trailing"])
            .arg(Flag::with_name("verbose").unwrap())
            .parse()
            .unwrap();

        assert!(args.is_given("verbose"));
        assert_eq!(args.get("verbose"), None);
    }

    #[rstest]
    #[case(["-", "-v"])]
    #[case(["--", "-v"])]
    fn parse_malformed_skipped(#[case] tokens: [&str; 2]) {
        let args = registry(tokens)
            .arg(Flag::with_name("verbose").unwrap())
            .parse()
            .unwrap();

        // The malformed token is recovered locally; the scan continues.
        assert!(args.is_given("verbose"));
    }

    #[test]
    fn parse_short_first_character_only() {
        // '-vx' is not a cluster; only 'v' is consulted.
        let args = registry(["-vx"])
            .arg(Flag::with_name("verbose").unwrap())
            .arg(Flag::with_name("extra").unwrap().short('x'))
            .parse()
            .unwrap();

        assert!(args.is_given("verbose"));
        assert!(!args.is_given("extra"));
    }

    #[test]
    fn parse_positionals_ignored() {
        let args = registry(["input.txt", "-v", "output.txt"])
            .arg(Flag::with_name("verbose").unwrap())
            .arg(Flag::with_name("file").unwrap().expects_value())
            .parse()
            .unwrap();

        assert!(args.is_given("verbose"));
        assert_eq!(args.get("file"), None);
    }

    #[test]
    fn parse_unknown_tokens_ignored() {
        let args = registry(["--moot", "-z"])
            .arg(Flag::with_name("verbose").unwrap())
            .parse()
            .unwrap();

        assert!(!args.is_given("verbose"));
    }

    #[test]
    fn parse_value_out_of_range() {
        // A value-expecting flag as the last token stays absent; it only
        // matters if that flag is also required.
        let args = registry(["--file"])
            .arg(Flag::with_name("file").unwrap().expects_value())
            .parse()
            .unwrap();

        assert_eq!(args.get("file"), None);
    }

    #[test]
    fn parse_value_out_of_range_required() {
        let error = registry(["--file"])
            .arg(Flag::with_name("file").unwrap().expects_value().required())
            .parse()
            .unwrap_err();

        assert_eq!(
            error,
            ParseError::MissingRequiredValue(vec!["file".to_string()])
        );
    }

    #[test]
    fn parse_value_may_look_like_a_flag() {
        // The token after a value-expecting flag binds verbatim, and is then
        // still classified by the scan.
        let args = registry(["--file", "--verbose"])
            .arg(Flag::with_name("file").unwrap().expects_value())
            .arg(Flag::with_name("verbose").unwrap())
            .parse()
            .unwrap();

        assert_eq!(args.get("file"), Some("--verbose"));
        assert!(args.is_given("verbose"));
    }

    #[test]
    fn parse_rebinding_overwrites() {
        let args = registry(["-f", "first", "-f", "second"])
            .arg(Flag::with_name("file").unwrap().expects_value())
            .parse()
            .unwrap();

        assert_eq!(args.get("file"), Some("second"));
    }

    #[test]
    fn parse_missing_required() {
        let error = registry([])
            .arg(Flag::with_name("name").unwrap().expects_value().required())
            .parse()
            .unwrap_err();

        assert_eq!(
            error,
            ParseError::MissingRequiredValue(vec!["name".to_string()])
        );
    }

    #[test]
    fn parse_missing_required_collects_all() {
        let error = registry(["-v"])
            .arg(Flag::with_name("file").unwrap().expects_value().required())
            .arg(Flag::with_name("verbose").unwrap())
            .arg(Flag::with_name("output").unwrap().expects_value().required())
            .parse()
            .unwrap_err();

        assert_eq!(
            error,
            ParseError::MissingRequiredValue(vec!["file".to_string(), "output".to_string()])
        );
    }

    #[test]
    fn parse_required_switch() {
        // A required option is satisfied by presence alone.
        let args = registry(["-f"])
            .arg(Flag::with_name("force").unwrap().required())
            .parse()
            .unwrap();

        assert!(args.is_given("force"));
    }

    #[test]
    fn parse_required_switch_missing() {
        let error = registry([])
            .arg(Flag::with_name("force").unwrap().required())
            .parse()
            .unwrap_err();

        assert_eq!(
            error,
            ParseError::MissingRequiredValue(vec!["force".to_string()])
        );
    }

    #[test]
    fn parse_required_satisfied_by_empty_value() {
        // Presence is the sum type, not string emptiness.
        let args = registry(["--file", ""])
            .arg(Flag::with_name("file").unwrap().expects_value().required())
            .parse()
            .unwrap();

        assert_eq!(args.get("file"), Some(""));
    }

    #[test]
    fn parse_duplicate_names_first_wins() {
        let args = registry(["--item", "value"])
            .arg(Flag::with_name("item").unwrap().expects_value())
            .arg(Flag::with_name("item").unwrap().expects_value())
            .parse()
            .unwrap();

        assert_eq!(args.get("item"), Some("value"));
        assert_eq!(args.flags[0].value(), Some("value"));
        assert_eq!(args.flags[1].value(), None);
    }

    #[rstest]
    #[case(["--help"])]
    #[case(["-h"])]
    fn parse_help(#[case] tokens: [&str; 1]) {
        // Setup
        let (sender, receiver) = channel_interface();
        let registry = registry(tokens)
            .user_interface(Box::new(sender))
            .arg(Flag::with_name("name").unwrap().expects_value().required());

        // Execute
        let error = registry.parse().unwrap_err();

        // Verify: the help display pre-empts the required check.
        assert_matches!(error, ParseError::HelpRequested);

        let (message, error) = receiver.consume();
        let message = message.unwrap();
        assert_contains!(message, "usage: program [-h]");
        assert_contains!(message, "-h, --help");
        assert_eq!(error, None);
    }

    #[test]
    fn parse_help_reserved_over_registered_short() {
        let (sender, receiver) = channel_interface();
        let registry = registry(["-h"])
            .user_interface(Box::new(sender))
            .arg(Flag::with_name("host").unwrap().short('h').expects_value());

        let error = registry.parse().unwrap_err();

        assert_matches!(error, ParseError::HelpRequested);
        assert!(receiver.consume().0.is_some());
    }

    #[test]
    fn parse_raise_error_prints_nothing() {
        let (sender, receiver) = channel_interface();
        let registry = registry([])
            .user_interface(Box::new(sender))
            .arg(Flag::with_name("name").unwrap().expects_value().required());

        registry.parse().unwrap_err();

        let (message, error) = receiver.consume();
        assert_eq!(message, None);
        assert_eq!(error, None);
    }

    #[test]
    fn parse_twice_keeps_bindings() {
        let args = registry(["-n", "John"])
            .arg(Flag::with_name("name").unwrap().expects_value().required())
            .parse()
            .unwrap();

        let args = args.parse().unwrap();

        assert_eq!(args.get("name"), Some("John"));
    }

    #[test]
    fn get_is_stable() {
        let args = registry(["-n", "John"])
            .arg(Flag::with_name("name").unwrap().expects_value())
            .parse()
            .unwrap();

        assert_eq!(args.get("name"), Some("John"));
        assert_eq!(args.get("name"), Some("John"));
    }

    #[test]
    fn missing_required_diagnostic_format() {
        let error = ParseError::MissingRequiredValue(vec![
            "file".to_string(),
            "output".to_string(),
        ]);

        assert_eq!(
            error.to_string(),
            "Error: Missing required value for flag 'file'\n\
             Error: Missing required value for flag 'output'"
        );
    }
}
