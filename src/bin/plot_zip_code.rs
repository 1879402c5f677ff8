use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zip_trends::credentials::Credentials;
use zip_trends::plot_zip_code::parse_cli;
use zip_trends::default_credentials_path;
use zip_trends::query::{connect, fetch_zip_code};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, metric, zip_codes, loglevel) = parse_cli();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let config = match config {
        Some(p) => p,
        None => default_credentials_path(std::env::current_exe()?),
    };
    info!(config = %config.display(), metric = %metric, zip_codes = ?zip_codes);

    let credentials = Credentials::from_json_file(&config)?;
    let mut conn = connect(&credentials).await?;

    for zip_code in zip_codes.iter() {
        let table = fetch_zip_code(&mut conn, &metric, zip_code).await?;
        debug!("\n{}", table);
        let chart = table.chart(&metric, zip_code)?;
        chart.show();
    }
    Ok(())
}
