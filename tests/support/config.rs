use std::io::Write;

use stakegate::testkit::config::CONFIG_TOML;
use tempfile::NamedTempFile;

const BACKEND_SECTION: &str =
    "[backend]\napi_url = \"https://api.example.com/api\"\ncommunity_id = 7\n";

/// The canonical config without `[backend]`, so levels come from the file.
pub fn offline_toml() -> String {
    assert!(CONFIG_TOML.contains(BACKEND_SECTION));
    CONFIG_TOML.replace(BACKEND_SECTION, "")
}

/// Write `contents` to a temporary `.toml` file that lives as long as the
/// returned handle.
pub fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("stakegate-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}
