use thiserror::Error;

/// A flag definition rejected at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDefinition {
    /// The flag name must not be empty.
    #[error("Cannot define a flag with an empty name.")]
    EmptyName,
}

/// A single command line flag definition.
///
/// A `Flag` starts from [`Flag::with_name`] and is refined through a chain of
/// by-move setters:
/// ```
/// use declarg::Flag;
///
/// # fn main() -> Result<(), declarg::InvalidDefinition> {
/// let flag = Flag::with_name("output")?
///     .short('o')
///     .expects_value()
///     .required();
///
/// assert_eq!(flag.short_form(), 'o');
/// assert_eq!(flag.long_form(), "output");
/// # Ok(())
/// # }
/// ```
///
/// The definition half (name, forms, expectations) is fixed once the flag is
/// registered; the runtime half (bound value, given-mark) is written exactly
/// once per parse pass, by the registry that owns the flag.
#[derive(Debug)]
pub struct Flag {
    name: String,
    short: char,
    long: String,
    expects_value: bool,
    required: bool,
    option: bool,
    value: Option<String>,
    given: bool,
    help: Option<String>,
}

impl Flag {
    /// Create a flag named `name`.
    ///
    /// The short form defaults to the first character of the name, and the
    /// long form defaults to the name itself.
    /// An empty name is rejected immediately with
    /// [`InvalidDefinition::EmptyName`].
    pub fn with_name(name: impl Into<String>) -> Result<Self, InvalidDefinition> {
        let name = name.into();
        let short = name.chars().next().ok_or(InvalidDefinition::EmptyName)?;

        Ok(Self {
            long: name.clone(),
            name,
            short,
            expects_value: false,
            required: false,
            option: true,
            value: None,
            given: false,
            help: None,
        })
    }

    /// Override the short form.
    pub fn short(mut self, short: char) -> Self {
        self.short = short;
        self
    }

    /// Override the long form.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    /// Declare that this flag consumes the token following it as its value.
    ///
    /// A value-taking flag cannot double as a bare switch, so this also
    /// permanently clears the option property.
    pub fn expects_value(mut self) -> Self {
        self.expects_value = true;
        self.option = false;
        self
    }

    /// Declare this flag mandatory.
    ///
    /// Independent of [`Flag::expects_value`]: a required switch is satisfied
    /// by appearing at all, a required value-taking flag by receiving a value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description, shown in the help message.
    /// If repeated, only the final description applies.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// The name this flag was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short form matched against `-N` tokens.
    pub fn short_form(&self) -> char {
        self.short
    }

    /// The long form matched against `--NAME` tokens.
    pub fn long_form(&self) -> &str {
        &self.long
    }

    /// Whether this flag consumes the following token as its value.
    pub fn is_expecting_value(&self) -> bool {
        self.expects_value
    }

    /// Whether this flag must be satisfied for parsing to succeed.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this flag is an option: a switch whose presence alone is the
    /// signal.
    pub fn is_option(&self) -> bool {
        self.option
    }

    /// Whether this option appeared in the parsed tokens.
    pub fn is_given(&self) -> bool {
        self.given
    }

    /// The bound value, if one is present.
    ///
    /// Presence is tracked by the `Option` itself: a value bound to the empty
    /// string is still present.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.help.as_deref()
    }

    // Runtime state, written only by the registry during a parse pass.

    pub(crate) fn bind(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub(crate) fn mark_given(&mut self) {
        self.given = true;
    }

    pub(crate) fn is_satisfied(&self) -> bool {
        self.value.is_some() || (self.option && self.given)
    }
}
