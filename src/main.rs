fn main() {
    // Log lines go to stderr; stdout carries the protocol.
    env_logger::init();
    xiangqi_engine::ucci::run_ucci_loop();
}
