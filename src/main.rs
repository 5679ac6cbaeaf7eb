use std::process::ExitCode;

fn main() -> ExitCode {
    simple_notes_lib::run()
}
