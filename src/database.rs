//! MongoDB connection setup.

use log::info;
use mongodb::bson::doc;
use mongodb::{Client, Database};

use crate::config::Config;
use crate::errors::RepositoryError;

/// Connect to MongoDB, verify the connection with a ping and return the
/// configured database.
pub async fn connect(config: &Config) -> Result<Database, RepositoryError> {
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = client.database(&config.database_name);

    db.run_command(doc! { "ping": 1 }).await?;
    info!("Connected to MongoDB successfully!");

    Ok(db)
}
