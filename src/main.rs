use kilo::{Config, Editor, Error};

/// Parse the command-line arguments, then run the editor. The editor restores the terminal on
/// every exit path, so by the time the error is printed the terminal is usable again.
fn main() {
    if let Err(err) = run() {
        eprintln!("kilo: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let mut args = std::env::args().skip(1);
    let file_name = match (args.next(), args.next()) {
        (Some(arg), _) if arg.starts_with('-') => return Err(Error::UnrecognizedOption(arg)),
        (file_name, None) => file_name,
        _ => return Err(Error::TooManyArguments(std::env::args().count().saturating_sub(1))),
    };
    Editor::new(Config::default())?.run(file_name)
}
