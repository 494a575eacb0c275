use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::flag::Flag;
use crate::parser::UserInterface;

struct HelpEntry {
    name: String,
    short: char,
    long: String,
    expects_value: bool,
    required: bool,
    help: Option<String>,
}

impl From<&Flag> for HelpEntry {
    fn from(flag: &Flag) -> Self {
        Self {
            name: flag.name().to_string(),
            short: flag.short_form(),
            long: flag.long_form().to_string(),
            expects_value: flag.is_expecting_value(),
            required: flag.is_required(),
            help: flag.description().map(String::from),
        }
    }
}

impl HelpEntry {
    fn placeholder(&self) -> String {
        self.name.to_ascii_uppercase().replace('-', "_")
    }

    /// The usage-line item.
    /// Ex: `[-v]`, `[-f FILE]`, or `-f FILE` when required.
    fn grammar(&self) -> String {
        let item = if self.expects_value {
            format!("-{short} {value}", short = self.short, value = self.placeholder())
        } else {
            format!("-{short}", short = self.short)
        };

        if self.required {
            item
        } else {
            format!("[{item}]")
        }
    }

    /// The options-table specifier.
    /// Ex: `-v, --verbose` or `-f FILE, --file FILE`.
    fn specifier(&self) -> String {
        if self.expects_value {
            format!(
                "-{short} {value}, --{long} {value}",
                short = self.short,
                long = self.long,
                value = self.placeholder(),
            )
        } else {
            format!("-{short}, --{long}", short = self.short, long = self.long)
        }
    }
}

pub(crate) struct Printer {
    program: String,
    version: Option<String>,
    author: Option<String>,
    about: Option<String>,
    entries: Vec<HelpEntry>,
    terminal_width: Option<usize>,
}

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space
// between them.
const MINIMUM_MIDDLE_WIDTH: usize = 17;
const DEFAULT_TOTAL_WIDTH: usize = 80;
const PADDING_WIDTH: usize = 2;
const MAIN_INDENT: usize = 1;

impl Printer {
    pub(crate) fn terminal(
        program: &str,
        version: Option<&str>,
        author: Option<&str>,
        about: Option<&str>,
        flags: &[Flag],
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(program, version, author, about, flags, terminal_width)
    }

    pub(crate) fn new(
        program: &str,
        version: Option<&str>,
        author: Option<&str>,
        about: Option<&str>,
        flags: &[Flag],
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            program: program.to_string(),
            version: version.map(String::from),
            author: author.map(String::from),
            about: about.map(String::from),
            entries: flags.iter().map(HelpEntry::from).collect(),
            terminal_width,
        }
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        let total_width = self.terminal_width.unwrap_or(DEFAULT_TOTAL_WIDTH);
        let mut lines = Vec::default();

        if let Some(version) = &self.version {
            lines.push(format!("{program} {version}", program = self.program));
        }

        if let Some(author) = &self.author {
            lines.push(author.clone());
        }

        if let Some(about) = &self.about {
            lines.extend(wrap(about, std::cmp::max(total_width, MINIMUM_MIDDLE_WIDTH)));
        }

        if !lines.is_empty() {
            lines.push(String::default());
        }

        let mut usage = format!("usage: {program} [-{HELP_SHORT}]", program = self.program);

        for entry in &self.entries {
            usage.push(' ');
            usage.push_str(&entry.grammar());
        }

        lines.push(usage);
        lines.push("options:".to_string());

        let mut rows = vec![(
            format!("-{HELP_SHORT}, --{HELP_NAME}"),
            HELP_MESSAGE.to_string(),
        )];

        for entry in &self.entries {
            rows.push((entry.specifier(), entry.help.clone().unwrap_or_default()));
        }

        let left_width = rows
            .iter()
            .map(|(specifier, _)| specifier.len())
            .max()
            .expect("internal error - the help row always exists");
        let middle_width = std::cmp::max(
            MINIMUM_MIDDLE_WIDTH,
            total_width.saturating_sub(MAIN_INDENT + left_width + PADDING_WIDTH),
        );
        let indent = MAIN_INDENT;
        let padding = PADDING_WIDTH;

        for (specifier, description) in rows {
            let parts = wrap(&description, middle_width);

            if parts.is_empty() {
                lines.push(format!("{:indent$}{specifier}", ""));
            } else {
                for (i, part) in parts.iter().enumerate() {
                    if i == 0 {
                        lines.push(format!(
                            "{:indent$}{specifier:<left_width$}{:padding$}{part}",
                            "", ""
                        ));
                    } else {
                        lines.push(format!(
                            "{:indent$}{:left_width$}{:padding$}{part}",
                            "", "", ""
                        ));
                    }
                }
            }
        }

        user_interface.print(lines.join("\n"));
    }
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            take_word(width, &mut lines, &mut current, word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = String::default();
            take_word(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Words wider than the line are split hard, with a hyphen at each break.
fn take_word(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let step = width - 1;
    let mut start = 0;

    while start + step < word.len() {
        lines.push(format!("{}-", &word[start..start + step]));
        start += step;
    }

    current.push_str(&word[start..]);
}
