// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn begin_and_finish_round() {
    let store = MemoryStore::new();
    let mut task = Task::up("m1");
    store.begin_migration_task(&mut task).await.unwrap();
    assert_eq!(task.id, Some(1));
    assert!(store.has_pending_migration().await.unwrap());

    store.finish_migration_task(&task).await.unwrap();
    assert!(!store.has_pending_migration().await.unwrap());
    assert_eq!(store.applied(), vec![(Direction::Up, "m1".to_string())]);
}

#[tokio::test]
async fn foreign_pending_blocks_registration() {
    let store = MemoryStore::new();
    let id = store.insert_foreign_pending(Task::up("other"));

    let mut task = Task::up("m1");
    let err = store.begin_migration_task(&mut task).await.unwrap_err();
    assert!(matches!(err, StoreError::PendingMigration));

    store.complete_row(id, None);
    store.begin_migration_task(&mut task).await.unwrap();
}

#[tokio::test]
async fn contested_names_lose_the_race() {
    let store = MemoryStore::new();
    store.contest("m1");
    let mut task = Task::up("m1");
    let err = store.begin_migration_task(&mut task).await.unwrap_err();
    assert!(matches!(err, StoreError::PendingMigration));
    assert!(store.rows().is_empty());

    // Only the next attempt loses
    store.begin_migration_task(&mut task).await.unwrap();
    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn concurrent_registration_admits_one() {
    let store = MemoryStore::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut task = Task::up(format!("m{i}"));
                store.begin_migration_task(&mut task).await
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(store.rows().iter().filter(|t| t.is_pending()).count(), 1);
}

#[tokio::test]
async fn calls_are_recorded_and_close_is_final() {
    let store = MemoryStore::new();
    store.init().await.unwrap();
    store.close().await.unwrap();
    assert!(matches!(
        store.last_migration_task().await,
        Err(StoreError::Closed)
    ));
    assert_eq!(
        store.calls(),
        vec![StoreCall::Init, StoreCall::Close, StoreCall::LastMigrationTask]
    );
}
