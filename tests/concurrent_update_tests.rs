/// Concurrent update tests
///
/// Many tasks race to write the same row from the same starting version.
/// Run with: cargo test --test concurrent_update_tests
mod common;

use common::{Counter, session, stored_version};
use rowversion::prelude::*;
use std::sync::Arc;
use tokio::sync::Barrier;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_one_concurrent_update_wins() {
    let session = session().await;

    let mut counter = Counter::new(0);
    session.create(&mut counter).await.unwrap();
    let id = counter.pk();

    let num_tasks = 8;
    let barrier = Arc::new(Barrier::new(num_tasks));
    let mut handles = vec![];

    for task_id in 0..num_tasks {
        let session = session.clone();
        let barrier = Arc::clone(&barrier);

        let handle = tokio::spawn(async move {
            let mut copy = session.find::<Counter>(id).await.unwrap().unwrap();
            copy.value = task_id as i64;
            barrier.wait().await;
            session.update(&mut copy).await
        });
        handles.push(handle);
    }

    let mut wins = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => wins += 1,
            Err(err) => {
                assert_eq!(err, DbError::ConcurrentModification { expected_version: 1 });
                conflicts += 1;
            }
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, num_tasks - 1);
    assert_eq!(stored_version(&session, id).await, Some(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_retry_loop_applies_every_increment() {
    let session = session().await;

    let mut counter = Counter::new(0);
    session.create(&mut counter).await.unwrap();
    let id = counter.pk();

    let num_tasks = 5;
    let increments = 10;
    let mut handles = vec![];

    for _ in 0..num_tasks {
        let session = session.clone();
        let handle = tokio::spawn(async move {
            for _ in 0..increments {
                let mut copy = session.find::<Counter>(id).await.unwrap().unwrap();
                loop {
                    copy.value += 1;
                    match session.update(&mut copy).await {
                        Ok(()) => break,
                        Err(err) if err.is_concurrent_modification() => {
                            assert!(session.reload(&mut copy).await.unwrap());
                        }
                        Err(err) => panic!("unexpected error: {}", err),
                    }
                }
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let total = (num_tasks * increments) as i64;
    let stored = session.find::<Counter>(id).await.unwrap().unwrap();
    assert_eq!(stored.value, total);
    assert_eq!(stored.version(), total as u64 + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_update_races_delete() {
    let session = session().await;

    let mut counter = Counter::new(0);
    session.create(&mut counter).await.unwrap();
    let id = counter.pk();

    let barrier = Arc::new(Barrier::new(2));

    let updater = {
        let session = session.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let mut copy = session.find::<Counter>(id).await.unwrap().unwrap();
            copy.value = 1;
            barrier.wait().await;
            session.update(&mut copy).await
        })
    };
    let deleter = {
        let session = session.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let mut copy = session.find::<Counter>(id).await.unwrap().unwrap();
            barrier.wait().await;
            session.delete_unscoped(&mut copy).await
        })
    };

    let updated = updater.await.unwrap();
    let deleted = deleter.await.unwrap();
    assert!(updated.is_ok() != deleted.is_ok());

    if updated.is_ok() {
        assert_eq!(stored_version(&session, id).await, Some(2));
    } else {
        assert_eq!(stored_version(&session, id).await, None);
    }
}
