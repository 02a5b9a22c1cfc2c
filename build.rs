// Build script for flutter_rust_bridge code generation
//
// Dart bindings are produced by the CLI tool rather than from here:
//   flutter_rust_bridge_codegen generate

fn main() {
    // Tell cargo to rerun this build script if api.rs changes
    println!("cargo:rerun-if-changed=src/api.rs");
}
