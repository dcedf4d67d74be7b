//! Shared setup for integration tests.

use darkmatter::ConfigService;
use std::path::PathBuf;
use std::sync::Once;

static TRACING: Once = Once::new();

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture_config() -> ConfigService {
    init_tracing();
    ConfigService::from_json_file(fixtures_dir().join("config.json")).unwrap()
}

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}
