fn main() {
    env_logger::init();
    // Entry point - delegate to the garden core
    if let Err(e) = garden_core::run() {
        eprintln!("Garden error: {}", e);
    }
}
