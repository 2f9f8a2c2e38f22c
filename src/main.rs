use std::process;

fn main() {
    if let Err(e) = resplan_export::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
