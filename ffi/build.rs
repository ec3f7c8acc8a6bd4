//! Generate `include/todo_sync.h` from the `extern "C"` surface.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let include_dir = crate_dir.join("include");
    if let Err(e) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=could not create {}: {e}", include_dir.display());
        return;
    }

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("TODO_SYNC_H".to_string()),
        ..cbindgen::Config::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("todo_sync.h"));
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
