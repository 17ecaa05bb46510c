use std::sync::Arc;

use markbook::config::Config;
use markbook::pg::PgStudentStore;
use markbook::repo::StudentRepository;
use markbook::store::{MemoryStudentStore, StudentStore};
use markbook::students;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env()?;

    let store: Arc<dyn StudentStore> = match &config.database_url {
        Some(url) => Arc::new(PgStudentStore::connect(url).await?),
        None => {
            log::warn!("DATABASE_URL is not set, student records will only live in memory");
            Arc::new(MemoryStudentStore::new())
        }
    };
    let app = students::router(StudentRepository::new(store));

    log::info!("Starting Markbook HTTP server on http://{}", config.bind_addr);
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
