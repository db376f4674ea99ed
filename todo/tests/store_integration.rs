//! End-to-end tests: a store, its persister and a real backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;
use todomvc::{
    Filter, Hydration, Persister, PersisterHandle, TodoAction, TodoEnvironment, TodoError,
    TodoStorage, TodoStore, open_store,
};
use todomvc_core::environment::{KeyValueStore, RandomIds};
use todomvc_runtime::StoreConfig;
use todomvc_storage::{FileStore, MemoryStore};
use todomvc_testing::SequentialIds;

const WAIT: Duration = Duration::from_secs(2);

fn env_over(backend: Arc<dyn KeyValueStore>) -> TodoEnvironment {
    TodoEnvironment::new(TodoStorage::new(backend), Arc::new(SequentialIds::new()), "todos")
}

async fn session(env: TodoEnvironment) -> (TodoStore, PersisterHandle) {
    let persister = Persister::for_environment(&env);
    let store = open_store(env, StoreConfig::default()).await.unwrap();
    let handle = persister.spawn(store.subscribe_state());
    (store, handle)
}

async fn add(store: &TodoStore, title: &str) {
    store
        .send(TodoAction::Add {
            title: title.to_string(),
        })
        .await
        .unwrap();
}

async fn visible(store: &TodoStore, filter: Filter) -> Vec<String> {
    store
        .state(move |s| s.filtered(filter).map(|t| t.title.clone()).collect())
        .await
}

/// Waits until the backend holds `expected` under "todos"
async fn wait_for_stored(backend: &dyn KeyValueStore, expected: &str) {
    tokio::time::timeout(WAIT, async {
        while backend.get("todos").unwrap().as_deref() != Some(expected) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_breakfast_and_dinner_scenario() {
    let backend = MemoryStore::new();
    let (store, _saving) = session(env_over(Arc::new(backend.clone()))).await;

    add(&store, "아침 먹기").await;
    add(&store, "저녁 먹기").await;
    assert_eq!(visible(&store, Filter::All).await, vec!["아침 먹기", "저녁 먹기"]);

    let first = store.state(|s| s.id_at(0)).await.unwrap();
    store.send(TodoAction::Toggle { id: first }).await.unwrap();
    assert_eq!(visible(&store, Filter::Active).await, vec!["저녁 먹기"]);
    assert_eq!(visible(&store, Filter::Completed).await, vec!["아침 먹기"]);

    store.send(TodoAction::ClearCompleted).await.unwrap();
    let titles = store.state(|s| s.titles().join(",")).await;
    assert_eq!(titles, "저녁 먹기");

    wait_for_stored(&backend, r#"[{"title":"저녁 먹기","isDone":false}]"#).await;
}

#[tokio::test]
async fn test_list_survives_a_new_session() {
    let backend = MemoryStore::new();

    {
        let (store, _saving) = session(env_over(Arc::new(backend.clone()))).await;
        add(&store, "아침 먹기").await;
        wait_for_stored(&backend, r#"[{"title":"아침 먹기","isDone":false}]"#).await;
        store.shutdown_default().await.unwrap();
    }

    let (store, _saving) = session(env_over(Arc::new(backend))).await;
    let state = store.state(Clone::clone).await;
    assert_eq!(state.titles(), vec!["아침 먹기"]);
    assert!(!state.todos[0].is_done);
    assert_eq!(state.hydration, Hydration::Loaded);
}

#[tokio::test]
async fn test_file_backend_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();

    {
        let env = TodoEnvironment::new(
            TodoStorage::new(Arc::new(FileStore::new(dir.path()))),
            Arc::new(RandomIds),
            "todos",
        );
        let (store, _saving) = session(env).await;
        add(&store, "아침 먹기").await;
        add(&store, "저녁 먹기").await;
        let second = store.state(|s| s.id_at(1)).await.unwrap();
        store.send(TodoAction::Toggle { id: second }).await.unwrap();

        wait_for_stored(
            &FileStore::new(dir.path()),
            r#"[{"title":"아침 먹기","isDone":false},{"title":"저녁 먹기","isDone":true}]"#,
        )
        .await;
    }

    let env = TodoEnvironment::with_backend(Arc::new(FileStore::new(dir.path())));
    let store = open_store(env, StoreConfig::default()).await.unwrap();
    assert_eq!(visible(&store, Filter::Completed).await, vec!["저녁 먹기"]);
    assert_eq!(visible(&store, Filter::Active).await, vec!["아침 먹기"]);
}

#[tokio::test]
async fn test_malformed_storage_starts_empty() {
    let backend = MemoryStore::new();
    backend.set("todos", "{not a list").unwrap();

    let (store, _saving) = session(env_over(Arc::new(backend.clone()))).await;
    assert_eq!(store.state(todomvc::TodoState::count).await, 0);

    add(&store, "fresh").await;
    wait_for_stored(&backend, r#"[{"title":"fresh","isDone":false}]"#).await;
}

#[tokio::test]
async fn test_state_before_load_is_never_saved() {
    let backend = MemoryStore::new();
    backend
        .set("todos", r#"[{"title":"stored","isDone":true}]"#)
        .unwrap();

    let env = env_over(Arc::new(backend.clone()));
    let store = todomvc_runtime::Store::new(
        todomvc::TodoState::new(),
        todomvc::TodoReducer::new(),
        env.clone(),
    );
    let mut saving = Persister::for_environment(&env).spawn(store.subscribe_state());

    // Mutations before the load must not clobber what is stored
    add(&store, "early").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(saving.saves(), 0);
    assert_eq!(
        backend.get("todos").unwrap().as_deref(),
        Some(r#"[{"title":"stored","isDone":true}]"#)
    );

    let mut load = store.send(TodoAction::Initialize).await.unwrap();
    load.wait().await;
    assert!(saving.wait_for_saves(1, WAIT).await);

    let titles = store.state(|s| s.titles().join(",")).await;
    assert_eq!(titles, "stored,early");
    wait_for_stored(
        &backend,
        r#"[{"title":"stored","isDone":true},{"title":"early","isDone":false}]"#,
    )
    .await;
}

#[tokio::test]
async fn test_second_initialize_does_not_reload() {
    let backend = MemoryStore::new();
    backend
        .set("todos", r#"[{"title":"stored","isDone":false}]"#)
        .unwrap();
    let store = open_store(env_over(Arc::new(backend.clone())), StoreConfig::default())
        .await
        .unwrap();

    let stored = store.state(|s| s.id_at(0)).await.unwrap();
    store.send(TodoAction::Remove { id: stored }).await.unwrap();

    let mut again = store.send(TodoAction::Initialize).await.unwrap();
    again.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(store.state(todomvc::TodoState::count).await, 0);
}

#[tokio::test]
async fn test_unknown_id_is_reported() {
    let (store, _saving) = session(env_over(Arc::new(MemoryStore::new()))).await;
    add(&store, "only").await;

    let only = store.state(|s| s.id_at(0)).await.unwrap();
    store.send(TodoAction::Remove { id: only }).await.unwrap();
    store.send(TodoAction::Toggle { id: only }).await.unwrap();

    let error = store.state(|s| s.last_error.clone()).await;
    assert_eq!(error, Some(TodoError::NotFound(only)));
}

#[tokio::test]
async fn test_subscribers_see_each_change() {
    let (store, _saving) = session(env_over(Arc::new(MemoryStore::new()))).await;
    let mut rx = store.subscribe_state();

    add(&store, "a").await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().count(), 1);

    store
        .send(TodoAction::SetFilter {
            filter: Filter::Completed,
        })
        .await
        .unwrap();
    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.filter, Filter::Completed);
    assert_eq!(snapshot.visible().count(), 0);
}

#[tokio::test]
async fn test_closing_a_session_saves_the_last_change() {
    let dir = tempfile::tempdir().unwrap();
    let env = || {
        TodoEnvironment::new(
            TodoStorage::new(Arc::new(FileStore::new(dir.path()))),
            Arc::new(RandomIds),
            "todos",
        )
    };

    let (store, saving) = session(env()).await;
    add(&store, "아침 먹기").await;
    let first = store.state(|s| s.id_at(0)).await.unwrap();
    store.send(TodoAction::Toggle { id: first }).await.unwrap();
    saving.close().await.unwrap();
    store.shutdown_default().await.unwrap();

    let stored = FileStore::new(dir.path()).get("todos").unwrap();
    assert_eq!(
        stored.as_deref(),
        Some(r#"[{"title":"아침 먹기","isDone":true}]"#)
    );

    let (store, _saving) = session(env()).await;
    assert_eq!(visible(&store, Filter::Completed).await, vec!["아침 먹기"]);
}
