//! Migrate command - creates the database schema and exits.

use image_randomizer::db::schema;

use crate::backend::create_database;
use crate::cli::DatabaseArgs;

/// Run the migrate command
pub async fn run(args: &DatabaseArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Opening a database creates its schema
    let db = create_database(args).await?;
    let version = schema::current_version(&db).await?;
    db.close().await;

    match version {
        Some(version) => println!("Schema is at version {version}"),
        None => println!("Schema version is not recorded"),
    }
    Ok(())
}
