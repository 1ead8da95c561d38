fn main() {
    block_mover::run();
}
