// Build script: ESP-IDF environment wiring only.
//
// Pad tables and tunables are hand-written in `src/config.rs`; there is no
// code generation step here (unlike the CW keyer's parameters.yaml build).

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    embuild::espidf::sysenv::output();
}
