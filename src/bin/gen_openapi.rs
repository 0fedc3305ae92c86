use std::path::PathBuf;

/// Writes the JSON API description to the given path (default `openapi.json`)
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    std::fs::write(&path, pod_viewer::api::openapi::document()?)?;
    println!("Wrote {}", path.display());
    Ok(())
}
