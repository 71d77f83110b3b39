//! Build script for openolt-bal crate.
//!
//! When the `bal-link` feature is enabled, this emits the link directives for
//! the BAL host libraries shipped with the vendor SDK. The search path comes
//! from `BAL_LIB_DIR` so the SDK can live outside the source tree.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=BAL_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_BAL_LINK").is_some() {
        if let Some(dir) = std::env::var_os("BAL_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
        }
        println!("cargo:rustc-link-lib=bal_host_api");
        println!("cargo:rustc-link-lib=bcm_host_api_common");
    }
}
