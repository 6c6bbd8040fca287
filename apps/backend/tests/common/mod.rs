// Shared per-binary setup for integration tests.

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}
