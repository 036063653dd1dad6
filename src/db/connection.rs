use mongodb::{options::ClientOptions, Client, Database};
use tracing::info;

use crate::utils::error::{AppError, AppResult};

pub async fn init_db(mongo_uri: &str, db_name: &str) -> AppResult<Database> {
    let mut client_options = ClientOptions::parse(mongo_uri)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse MongoDB URI: {}", e)))?;

    client_options.app_name = Some("CompanyPortal".to_string());

    let client = Client::with_options(client_options)
        .map_err(|e| AppError::DatabaseError(format!("Failed to initialize MongoDB client: {}", e)))?;

    info!("Connected to MongoDB database {}", db_name);

    Ok(client.database(db_name))
}
