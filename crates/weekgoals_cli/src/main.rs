//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `weekgoals_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // UI/FFI runtime setup.
    println!("weekgoals_core ping={}", weekgoals_core::ping());
    println!("weekgoals_core version={}", weekgoals_core::core_version());
    match weekgoals_core::resolve_state_path() {
        Ok(path) => println!("weekgoals_core state_path={}", path.display()),
        Err(err) => println!("weekgoals_core state_path_error={err}"),
    }
}
