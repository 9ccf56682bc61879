fn main() {
    if let Err(error) = brancher_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
