use declarg::{Flag, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Registry::from_env()
        .program("file-tool")
        .version("0.1.0")
        .about("Demonstrates required and optional value flags.")
        .arg(
            Flag::with_name("file")?
                .short('f')
                .long("file")
                .expects_value()
                .required()
                .help("The file to operate on."),
        )
        .arg(
            Flag::with_name("path")?
                .short('p')
                .long("path")
                .expects_value()
                .help("An optional search path."),
        )
        .arg(
            Flag::with_name("verbose")?
                .short('v')
                .long("verbose")
                .help("Explain what is being done."),
        )
        .parse()?;

    // The default ExitProcess policy has already terminated the process on a
    // missing required flag, so "file" is certain to hold a value here.
    if let Some(file) = args.get("file") {
        println!("File argument is: {file}");
    }

    if let Some(path) = args.get("path") {
        println!("Path argument is: {path}");
    }

    if args.is_given("verbose") {
        println!("Verbose flag is set...");
    }

    Ok(())
}
