fn main() {
    chess_core::uci::run();
}
