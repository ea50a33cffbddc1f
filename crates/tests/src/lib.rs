//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - Configuration file to running dispatcher
//! - HTTP scenarios against both dispatcher front-ends
//! - Concurrent check-ins and randomized interleavings

#[cfg(test)]
mod contract_tests {
    use std::io::Write;

    use config_loader::ConfigLoader;
    use contracts::{CheckIn, DispatchMode, ServiceQueue};
    use dispatcher::create_dispatcher;

    #[tokio::test]
    async fn test_config_file_drives_dispatcher() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[policy]\nratio_threshold = 1\nmode = \"actor\"\nactor_capacity = 8"
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(blueprint.policy.mode, DispatchMode::Actor);

        let dispatcher = create_dispatcher(&blueprint.policy);
        for i in 0..2 {
            dispatcher
                .enqueue(CheckIn::high(format!("H{i}"), format!("h{i}")))
                .await
                .unwrap();
            dispatcher
                .enqueue(CheckIn::normal(format!("N{i}"), format!("n{i}")))
                .await
                .unwrap();
        }

        // Threshold 1 alternates while both classes wait
        let mut served = Vec::new();
        while let Some(record) = dispatcher.dequeue_next().await.unwrap() {
            served.push(record.name);
        }
        assert_eq!(served, vec!["H0", "N0", "H1", "N1"]);
        dispatcher.shutdown().await;
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use api::{create_router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use contracts::{DispatchMode, PolicyConfig};
    use dispatcher::create_dispatcher;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(mode: DispatchMode) -> Router {
        let policy = PolicyConfig {
            mode,
            ..PolicyConfig::default()
        };
        let dispatcher = create_dispatcher(&policy);
        create_router(Arc::new(AppState::from_dispatcher(dispatcher, policy)))
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn check_in(router: &Router, name: &str, key: &str, class: &str) -> Value {
        let body = json!({ "name": name, "contactKey": key, "priorityClass": class });
        let request = Request::builder()
            .method("POST")
            .uri("/scheduler/checkIn")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = call(router, request).await;
        assert_eq!(status, StatusCode::OK, "check-in of {name} failed: {body}");
        body
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
        call(
            router,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn test_basic_interleaving_over_http() {
        for mode in [DispatchMode::Mutex, DispatchMode::Actor] {
            let router = router(mode);
            check_in(&router, "Alice", "1234567890", "HIGH").await;
            check_in(&router, "Bob", "2345678901", "HIGH").await;
            check_in(&router, "Charlie", "3456789012", "NORMAL").await;
            check_in(&router, "Dave", "4567890123", "HIGH").await;

            let mut served = Vec::new();
            loop {
                let (status, body) = get(&router, "/scheduler/nextCustomer").await;
                if status == StatusCode::NOT_FOUND {
                    assert_eq!(body["code"], "QUEUE_EMPTY");
                    break;
                }
                served.push((
                    body["name"].as_str().unwrap().to_string(),
                    body["serviceNumber"].as_u64().unwrap(),
                ));
            }

            assert_eq!(
                served,
                vec![
                    ("Alice".to_string(), 1),
                    ("Bob".to_string(), 2),
                    ("Charlie".to_string(), 3),
                    ("Dave".to_string(), 4),
                ],
                "mode {mode:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_lookup_then_serve_over_http() {
        for mode in [DispatchMode::Mutex, DispatchMode::Actor] {
            let router = router(mode);
            let body = check_in(&router, "John Doe", "5551234", "VIP").await;
            assert_eq!(body["serviceNumber"], 1);

            let (status, found) = get(&router, "/scheduler/findCustomer/5551234").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(found["name"], "John Doe");
            assert_eq!(found["priorityClass"], "HIGH");

            get(&router, "/scheduler/nextCustomer").await;
            let (status, body) = get(&router, "/scheduler/findCustomer/5551234").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "mode {mode:?}");
            assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn test_normal_only_fifo_over_http() {
        let router = router(DispatchMode::Actor);
        for (name, key) in [("P", "1"), ("Q", "2"), ("R", "3")] {
            check_in(&router, name, key, "NORMAL").await;
        }

        let mut names = Vec::new();
        for _ in 0..3 {
            let (_, body) = get(&router, "/scheduler/nextCustomer").await;
            names.push(body["name"].as_str().unwrap().to_string());
        }
        assert_eq!(names, vec!["P", "Q", "R"]);

        let (_, stats) = get(&router, "/scheduler/stats").await;
        assert_eq!(stats["counters"]["servedNormal"], 3);
        assert_eq!(stats["queue"]["normalWaiting"], 0);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use contracts::{
        CheckIn, DispatchMode, PolicyConfig, PriorityClass, ServiceQueue, ServiceRecord,
    };
    use dispatcher::{create_dispatcher, AnyDispatcher, Dispatcher};
    use rand::Rng;

    const TASKS: u64 = 8;
    const PER_TASK: u64 = 50;

    async fn concurrent_check_ins(dispatcher: Arc<AnyDispatcher>) -> Vec<ServiceRecord> {
        let mut handles = Vec::new();
        for task in 0..TASKS {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(tokio::spawn(async move {
                let mut records = Vec::new();
                for i in 0..PER_TASK {
                    let class = if (task + i) % 3 == 0 {
                        PriorityClass::Normal
                    } else {
                        PriorityClass::High
                    };
                    let check_in = CheckIn::new(format!("c{task}-{i}"), format!("{task}{i}"), class);
                    records.push(dispatcher.enqueue(check_in).await.unwrap());
                }
                records
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all
    }

    /// Longest run of HIGH dispatches made while a NORMAL customer was still waiting
    fn longest_high_run_with_normal_waiting(served: &[ServiceRecord]) -> usize {
        let mut normal_left = served
            .iter()
            .filter(|r| r.priority_class == PriorityClass::Normal)
            .count();
        let (mut run, mut longest) = (0, 0);
        for record in served {
            match record.priority_class {
                PriorityClass::High if normal_left > 0 => {
                    run += 1;
                    longest = longest.max(run);
                }
                PriorityClass::High => run = 0,
                PriorityClass::Normal => {
                    normal_left -= 1;
                    run = 0;
                }
            }
        }
        longest
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_check_ins_get_unique_numbers() {
        for mode in [DispatchMode::Mutex, DispatchMode::Actor] {
            let policy = PolicyConfig {
                mode,
                ..PolicyConfig::default()
            };
            let dispatcher = Arc::new(create_dispatcher(&policy));
            let issued = concurrent_check_ins(Arc::clone(&dispatcher)).await;

            let numbers: HashSet<u64> = issued.iter().map(|r| r.service_number).collect();
            let total = TASKS * PER_TASK;
            assert_eq!(numbers.len() as u64, total, "mode {mode:?}");
            assert_eq!(numbers, (1..=total).collect::<HashSet<_>>());

            let mut served = Vec::new();
            while let Some(record) = dispatcher.dequeue_next().await.unwrap() {
                served.push(record);
            }
            assert_eq!(served.len() as u64, total);

            // FIFO within each class
            for class in PriorityClass::ALL {
                let numbers: Vec<u64> = served
                    .iter()
                    .filter(|r| r.priority_class == class)
                    .map(|r| r.service_number)
                    .collect();
                assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{class} not FIFO");
            }

            assert!(longest_high_run_with_normal_waiting(&served) <= 2);

            let snapshot = dispatcher.snapshot().await.unwrap();
            assert_eq!(snapshot.total_waiting(), 0);
            assert_eq!(snapshot.last_issued, total);
        }
    }

    #[tokio::test]
    async fn test_random_interleavings_match_across_front_ends() {
        let mut rng = rand::rng();

        for _ in 0..20 {
            let threshold = rng.random_range(1..=4);
            let mutex = Dispatcher::with_ratio_threshold(threshold);
            let policy = PolicyConfig {
                ratio_threshold: threshold,
                mode: DispatchMode::Actor,
                ..PolicyConfig::default()
            };
            let actor = create_dispatcher(&policy);

            for step in 0..200 {
                if rng.random_bool(0.6) {
                    let class = if rng.random_bool(0.5) {
                        PriorityClass::High
                    } else {
                        PriorityClass::Normal
                    };
                    let check_in = CheckIn::new(format!("c{step}"), format!("k{step}"), class);
                    let a = ServiceQueue::enqueue(&mutex, check_in.clone()).await.unwrap();
                    let b = actor.enqueue(check_in).await.unwrap();
                    assert_eq!(a, b);
                } else {
                    let a = ServiceQueue::dequeue_next(&mutex).await.unwrap();
                    let b = actor.dequeue_next().await.unwrap();
                    assert_eq!(a, b, "threshold {threshold}, step {step}");
                }
            }

            assert_eq!(
                ServiceQueue::snapshot(&mutex).await.unwrap(),
                actor.snapshot().await.unwrap()
            );
            actor.shutdown().await;
        }
    }
}
