mod common;

use shortlink::AppError;
use shortlink::domain::repositories::LinkRepository;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_single_winner() {
    let ctx = common::create_test_state();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let resolver = ctx.state.resolver.clone();
            tokio::spawn(async move {
                resolver
                    .shorten(
                        &format!("https://example{}.com", i),
                        None,
                        Some("race01".to_string()),
                    )
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(info) => {
                assert_eq!(info.code, "race01");
                successes += 1;
            }
            Err(AppError::CodeTaken { .. }) => taken += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(taken, 15);
    assert_eq!(ctx.store.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_distinct() {
    let ctx = common::create_test_state();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let resolver = ctx.state.resolver.clone();
            tokio::spawn(async move {
                resolver
                    .shorten(&format!("https://example.com/{}", i), Some(5), None)
                    .await
            })
        })
        .collect();

    let mut codes = std::collections::HashSet::new();
    for handle in handles {
        let info = handle.await.unwrap().unwrap();
        assert!(codes.insert(info.code));
    }

    assert_eq!(codes.len(), 50);
    assert_eq!(ctx.store.count().await.unwrap(), 50);
}
