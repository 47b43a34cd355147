fn main() {
    if let Err(e) = rustkeysynth::runtime::native::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
