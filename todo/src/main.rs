//! Command-line walkthrough of the todo store.
//!
//! Runs a short session against a file-backed store, then opens a second
//! session over the same directory to show the list was kept.
//!
//! ```text
//! cargo run -p todomvc -- [DATA_DIR]
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use todomvc::{
    Filter, Persister, TodoAction, TodoConfig, TodoEnvironment, TodoState, TodoStorage, TodoStore,
    open_store,
};
use todomvc_core::environment::RandomIds;
use todomvc_storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todomvc=debug,todomvc_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = TodoConfig::default();
    if let Some(dir) = std::env::args().nth(1) {
        config = config.with_data_dir(dir);
    }

    println!("=== TodoMVC Store ===");
    println!("Data directory: {}\n", config.data_dir.display());

    let backend = Arc::new(FileStore::new(&config.data_dir));
    let env = TodoEnvironment::new(
        TodoStorage::new(backend),
        Arc::new(RandomIds),
        config.storage_key.clone(),
    );

    // Start from a clean slate so the walkthrough is repeatable
    env.storage
        .clear(&config.storage_key)
        .context("Failed to clear previous todos")?;

    first_session(env.clone(), &config).await?;
    second_session(env, &config).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}

async fn first_session(env: TodoEnvironment, config: &TodoConfig) -> Result<()> {
    println!("--- Session 1 ---");
    let persister = Persister::for_environment(&env);
    let store = open_store(env, config.store.clone()).await?;
    let saving = persister.spawn(store.subscribe_state());

    for title in ["아침 먹기", "저녁 먹기", "   "] {
        store.send(TodoAction::Add { title: title.to_string() }).await?;
    }
    print_list(&store, "after adding").await;

    let first = store
        .state(|s| s.id_at(0))
        .await
        .context("List should not be empty")?;
    store.send(TodoAction::Toggle { id: first }).await?;
    print_list(&store, "after completing the first item").await;

    for filter in [Filter::Active, Filter::Completed] {
        store.send(TodoAction::SetFilter { filter }).await?;
        let visible = store
            .state(|s| s.visible().map(|t| t.title.clone()).collect::<Vec<_>>())
            .await;
        println!("  {filter:<9} → {visible:?}");
    }
    store.send(TodoAction::SetFilter { filter: Filter::All }).await?;

    store.send(TodoAction::ClearCompleted).await?;
    print_list(&store, "after clearing completed").await;

    store.send(TodoAction::Remove { id: first }).await?;
    if let Some(rejected) = store.state(|s| s.last_error.clone()).await {
        println!("  Removing the cleared item again: {rejected}");
    }

    // Stop the persister only once the final list is on disk
    let titles = store.state(|s| s.titles().join(", ")).await;
    saving.close().await.context("Failed to save todos")?;
    println!("  Saved: [{titles}]");

    store.shutdown_default().await?;
    Ok(())
}

async fn second_session(env: TodoEnvironment, config: &TodoConfig) -> Result<()> {
    println!("\n--- Session 2 (same storage) ---");
    let store = open_store(env, config.store.clone()).await?;
    print_list(&store, "loaded").await;

    store.shutdown_default().await?;
    Ok(())
}

async fn print_list(store: &TodoStore, label: &str) {
    let state: TodoState = store.state(Clone::clone).await;
    println!(
        "{label}: {} total, {} active, {} completed",
        state.count(),
        state.active_count(),
        state.completed_count()
    );
    for (index, todo) in state.todos.iter().enumerate() {
        let mark = if todo.is_done { "x" } else { " " };
        println!("  {index}. [{mark}] {}", todo.title);
    }
}
