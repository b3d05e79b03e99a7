fn main() {
    if let Err(err) = csv_sift::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
