/// Headless entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use mosaic_editor::cli::{CliArgs, run};

    run(CliArgs::parse())
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
