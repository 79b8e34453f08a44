fn main() {
    quova::cli::run();
}
