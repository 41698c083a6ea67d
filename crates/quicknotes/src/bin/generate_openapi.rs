//! Writes the OpenAPI spec to `openapi.json` next to this crate's manifest.
//!
//! Usage: `cargo run --bin generate_openapi`

use quicknotes::server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let spec = ApiDoc::openapi()
        .to_pretty_json()
        .expect("failed to serialize OpenAPI spec");

    let out_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("openapi.json");
    std::fs::write(&out_path, &spec).expect("failed to write openapi.json");

    println!("Wrote OpenAPI spec to {}", out_path.display());
}
