//! vrgen - React to Vaadin binding generator
//!
//! Thin entry point; the command tree lives in `vrgen-cli`.

fn main() {
    let code = vrgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
