//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(err) = itinerant_cli::run() {
        report(&err);
        std::process::exit(1);
    }
}

#[expect(clippy::print_stderr, reason = "the binary reports fatal errors on stderr")]
fn report(err: &itinerant_cli::CliError) {
    eprintln!("itinerant: {err}");
}
