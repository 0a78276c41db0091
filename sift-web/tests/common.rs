use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_test_tracing() {
    INIT.call_once(|| {
        let json = std::env::var("SIFT_LOG_FORMAT")
            .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let builder = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer();
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}
