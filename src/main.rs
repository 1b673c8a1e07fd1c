//! gitviz binary entry point.

fn main() {
    if let Err(err) = gitviz::cli::run() {
        gitviz::ui::output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
