use log::info;

use user_docstore::config::CONFIG;
use user_docstore::database;
use user_docstore::repositories::{MongoUserStore, UserRepository};
use user_docstore::RepositoryError;

#[tokio::main]
async fn main() -> Result<(), RepositoryError> {
    // Initialize environment variables and logger
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(&CONFIG.log_level));

    let db = database::connect(&CONFIG).await?;

    MongoUserStore::new(&db).create_indexes().await?;

    let repository = UserRepository::with_database(&db);
    let users = repository.find_all().await?;
    info!(
        "User store ready: {} users in {}.{}",
        users.len(),
        CONFIG.database_name,
        CONFIG.users_collection
    );

    Ok(())
}
