//! Basic example showing how to use sea-orm-callsite.
//!
//! Run with: cargo run --example basic

use sea_orm::Database;
use sea_orm_callsite::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sea_orm_callsite=trace".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/test".into());

    tracing::info!("Connecting to database...");

    let db = Database::connect(&database_url).await?;

    // Option 1: Simple wrapping with defaults
    let db = AttributedConnection::from(db);

    // Option 2: Using the extension trait (more fluent)
    // let db = db.with_callsite();

    // Option 3: With custom configuration
    // let db = db.with_callsite_config(
    //     AttributionConfig::default()
    //         .with_workspace_area("services")
    //         .with_column_recording(true)
    // );

    // All queries through db now carry their call site.
    // Example query (would work with actual entities):
    //
    // let users = Users::find()
    //     .filter(users::Column::Active.eq(true))
    //     .all(&db)
    //     .await?;
    //
    // The statement arriving at the server reads:
    //
    //   SELECT … FROM users WHERE active = TRUE
    //     /*func_name=basic::main,file=basic.rs,line=42*/

    tracing::info!("Database connection established with call-site attribution");

    // You can also access the inner connection if needed
    let _inner = db.inner();

    Ok(())
}
