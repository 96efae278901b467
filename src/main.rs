use bethel_city::{
    config,
    core::{company, doctor, hospital},
    errors::Result,
    store::Store,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Configuration loaded (data dir: {})",
        app_config.storage.app_data_dir.display()
    );

    // 4. Open the store and make sure every table exists. SQLite creates the
    //    database file but not its directory.
    std::fs::create_dir_all(&app_config.storage.app_data_dir)?;
    config::database::ensure_database_dir(&app_config.database.url)?;
    let store = Store::connect(&app_config)
        .await
        .inspect(|_| info!("Store initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize store: {}", e))?;

    // 5. Readiness summary
    let companies = company::list_companies_with_employee_counts(&store).await?;
    let employees: u64 = companies.iter().map(|c| c.employee_count).sum();
    let hospitals = hospital::list_hospitals(&store).await?;
    let doctors = doctor::list_doctors(&store).await?;
    info!(
        "Ready: {} companies, {} employees, {} hospitals, {} doctors",
        companies.len(),
        employees,
        hospitals.len(),
        doctors.len()
    );

    Ok(())
}
