use std::process::ExitCode;

fn main() -> ExitCode {
    sectconf_cli::run()
}
