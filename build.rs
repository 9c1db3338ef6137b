fn main() {
    // Only the firmware build needs the ESP-IDF environment; host tests
    // compile without it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
