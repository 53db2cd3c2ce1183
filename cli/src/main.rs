//! Binary entrypoint for typi-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    env_logger::init();

    if let Err(err) = typi_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
