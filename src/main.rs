use anyhow::Context;

use liber_app::{catalog::Catalog, modules};
use liber_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load liber settings")?;
    liber_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        "liber-app bootstrap starting"
    );

    let catalog = Catalog::new();
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &catalog);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("liber-app bootstrap complete");

    liber_http::start_server(&registry, &settings).await?;

    registry.stop_modules().await?;
    Ok(())
}
