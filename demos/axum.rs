//! Example showing sea-orm-callsite integration with Axum.
//!
//! This demonstrates how markers name the HTTP handler that issued each query.
//!
//! Run with: cargo run --example axum

fn main() {
    println!(
        r#"
This example demonstrates the integration pattern with Axum.

Your setup would look like:

```rust
use axum::{{Router, routing::get, extract::State}};
use sea_orm::Database;
use sea_orm_callsite::prelude::*;
use std::sync::Arc;

// Application state with attributed database
struct AppState {{
    db: AttributedConnection,
}}

// Handler - queries issued here are labeled with this function
async fn get_users(State(state): State<Arc<AppState>>) -> String {{
    // The statement sent to the server carries this handler's location
    let users = Users::find()
        .all(&state.db)
        .await
        .unwrap();

    format!("Found {{}} users", users.len())
}}

#[tokio::main]
async fn main() {{
    tracing_subscriber::fmt::init();

    // Connect with attribution
    let db = Database::connect("postgres://localhost/mydb")
        .await
        .unwrap()
        .with_callsite_config(
            AttributionConfig::default()
                .with_workspace_area("services")
        );

    let state = Arc::new(AppState {{ db }});

    let app = Router::new()
        .route("/users", get(get_users))
        .with_state(state);

    // Start server...
}}
```

With `pg_stat_statements` enabled, the database side then shows:

    SELECT "users"."id", "users"."name" FROM "users"
      /*func_name=myapp::handlers::get_users,file=src/handlers/users.rs,line=18*/

and a slow-query log line maps straight back to the handler that issued it,
with no sampling, agents, or tracing backend required.
"#
    );
}
