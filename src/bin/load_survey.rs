use tracing::{error, info};

use stability_app::infrastructure::config::Settings;
use stability_app::infrastructure::db::connection::connect_pool;
use stability_app::infrastructure::db::repository::SurveyRepository;
use stability_app::{LoadSurveyUseCase, Result};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    info!("=== Stability App Data Loader ===");
    let settings = Settings::from_env();

    if let Err(err) = run(&settings).await {
        error!(error = %err, "Data load failed");
        std::process::exit(1);
    }
}

async fn run(settings: &Settings) -> Result<()> {
    info!(database = %settings.database_path.display(), "Connecting to database...");
    let pool = connect_pool(&settings.database_path).await?;
    let repo = SurveyRepository::new(pool);

    LoadSurveyUseCase::new(repo)
        .run(&settings.survey_csv_path)
        .await?;
    Ok(())
}
