//! Bakes the factory calibration codes into the binary.
//!
//! Reads `THERMOLOG_CAL_T30` / `THERMOLOG_CAL_T85` from the environment or
//! an optional `.env` file; absent values fall back to bench-characterized
//! defaults for the devkit sensor.

fn main() {
    // .env is optional; its absence just means defaults.
    let _ = dotenvy::dotenv();

    let t30 = std::env::var("THERMOLOG_CAL_T30").unwrap_or_else(|_| "673".into());
    let t85 = std::env::var("THERMOLOG_CAL_T85").unwrap_or_else(|_| "830".into());

    println!("cargo:rustc-env=THERMOLOG_CAL_T30={t30}");
    println!("cargo:rustc-env=THERMOLOG_CAL_T85={t85}");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=THERMOLOG_CAL_T30");
    println!("cargo:rerun-if-env-changed=THERMOLOG_CAL_T85");
}
