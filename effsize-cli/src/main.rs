//! Effsize command-line entry point.

fn main() {
    std::process::exit(effsize_cli::run());
}
