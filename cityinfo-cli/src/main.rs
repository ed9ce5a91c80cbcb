//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    let guard = cityinfo_cli::logging::init();

    if let Err(err) = cityinfo_cli::run() {
        eprintln!("cityinfo: {err}");
        drop(guard);
        std::process::exit(1);
    }
}
