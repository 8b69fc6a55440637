fn main() {
    if let Err(err) = hf_subdir::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
