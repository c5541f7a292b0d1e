// Initialisation des logs (tracing + tracing-subscriber)

use tracing_subscriber::EnvFilter;

/// Logs JSON filtrés par RUST_LOG (défaut: info).
/// Peut être appelé plusieurs fois, les appels suivants ne font rien.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
