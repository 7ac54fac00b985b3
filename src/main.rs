use cogworks::configuration::Settings;
use cogworks::startup::Application;
use cogworks::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("cogworks".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = Settings::get().expect("Failed to read configuration.");
    let application = Application::build(config).await?;
    tracing::info!(port = application.port, "Listening");

    application.run_until_stopped().await?;
    Ok(())
}
