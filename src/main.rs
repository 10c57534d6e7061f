use anyhow::Context;
use em::config::{EditorOptions, USAGE};
use em::input::StdinLineSource;
use em::{error, logging, Session};
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match EditorOptions::resolve(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("em: {}", err);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    logging::init(&options).context("failed to install logger")?;
    log::debug!("starting with {:?}", options);

    let mut session = Session::with_options(&options, StdinLineSource::stdin(), io::stdout());

    if let Some(path) = options.initial_file.clone() {
        session
            .open_initial(path)
            .context("failed to write to standard output")?;
    }

    let outcome = session
        .run()
        .context("failed to write to standard output")?;
    log::debug!("session finished: {:?}", outcome);

    Ok(())
}
