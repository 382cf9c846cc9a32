//! Binary entrypoint for fontfit-cli

fn main() {
    if let Err(err) = fontfit_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
