fn main() {
    healthguide_lib::run()
}
