use std::process::ExitCode;

fn main() -> ExitCode {
    match anam_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("anam: {e}");
            ExitCode::FAILURE
        }
    }
}
