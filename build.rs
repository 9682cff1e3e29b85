// Assembles the static demo site: copies `static/` into `dist/` so the wasm
// bundle and the host page ship together.
use std::path::Path;
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-changed=static");

    // The wasm bundle itself is produced by wasm-pack (see src/main.rs); the
    // build script only refreshes the site skeleton.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;
        options.overwrite = true;
        if let Err(e) = fs_extra::dir::copy(static_dir, out_dir, &options) {
            println!("cargo:warning=failed to copy static assets: {e}");
        }
    }
}
