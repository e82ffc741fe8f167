//! amd-service entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = amd_service::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
