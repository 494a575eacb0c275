use declarg::{Flag, ParseError, Registry, TerminationPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::from_env()
        .program("switches")
        .about("Demonstrates option flags and the raise-error policy.")
        .termination_policy(TerminationPolicy::RaiseError)
        .arg(Flag::with_name("verbose")?.help("Explain what is being done."))
        .arg(Flag::with_name("compile")?.help("Compile the sources."))
        .arg(
            Flag::with_name("jobs")?
                .short('j')
                .expects_value()
                .help("The worker count."),
        );

    let args = match registry.parse() {
        Ok(args) => args,
        // The help message has already been displayed.
        Err(ParseError::HelpRequested) => return Ok(()),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    println!("jobs: {}", args.get("jobs").unwrap_or("1"));
    println!("verbose: {}", args.is_given("verbose"));
    println!("compile: {}", args.is_given("compile"));

    Ok(())
}
