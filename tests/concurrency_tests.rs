use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ttag::*;
use test_utils::*;

/// Concurrency Tests
/// Tag libraries are defined once and shared by every render

#[tokio::test]
async fn test_shared_library_across_tasks() {
    let library = Arc::new(create_test_library());
    let context = Arc::new(create_test_context(&create_test_registry()));

    let success_count = Arc::new(AtomicUsize::new(0));
    let error_count = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for i in 0..100 {
        let library = library.clone();
        let context = context.clone();
        let success_count = success_count.clone();
        let error_count = error_count.clone();

        tasks.push(tokio::spawn(async move {
            // Every tenth render passes a value the argument rejects
            let token = if i % 10 == 0 {
                "'invalid'".to_string()
            } else {
                i.to_string()
            };
            let raw = RawArgs::new().keyword("limit", token.as_str());
            match library.clean("keyword", &raw, &*context, &NoHooks) {
                Ok(data) => {
                    assert_eq!(data.integer("limit"), Some(i as i64));
                    success_count.fetch_add(1, Ordering::SeqCst)
                }
                Err(e) => {
                    assert!(e.is_validation());
                    error_count.fetch_add(1, Ordering::SeqCst)
                }
            };
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(success_count.load(Ordering::SeqCst), 90);
    assert_eq!(error_count.load(Ordering::SeqCst), 10);
}

#[test]
fn test_one_binding_many_contexts_across_threads() {
    let spec = Arc::new(
        TagSpec::builder("positional")
            .arg("limit", Arg::integer().positional().build().unwrap())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let spec = spec.clone();
            std::thread::spawn(move || {
                let bound = spec.bind(&RawArgs::new().positional("n")).unwrap();
                let mut context = HashMap::new();
                context.insert("n".to_string(), Value::from(i * 10));
                bound.resolve(&context).unwrap().integer("limit")
            })
        })
        .collect();

    let results: Vec<Option<i64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, (0..8).map(|i| Some(i * 10)).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_cleaner_shared_between_arguments() {
    let counter = CountingCleaner::new();
    let cleaner: Arc<dyn Cleaner> = Arc::new(counter.clone());
    let spec = Arc::new(
        TagSpec::builder("counted")
            .arg("first", Arg::custom(cleaner.clone()).build().unwrap())
            .arg("second", Arg::custom(cleaner).null().build().unwrap())
            .build()
            .unwrap(),
    );

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let spec = spec.clone();
        tasks.push(tokio::spawn(async move {
            let raw = RawArgs::new().keyword("first", "1").keyword("second", "missing");
            spec.bind(&raw).unwrap().resolve(&EmptyContext).unwrap()
        }));
    }
    for task in tasks {
        let data = task.await.unwrap();
        assert_eq!(data["second"], Value::Empty);
    }

    // The nullable argument resolved to empty and skipped its cleaner
    assert_eq!(counter.calls(), 20);
}
