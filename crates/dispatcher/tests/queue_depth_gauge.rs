//! Queue-depth gauges under concurrent callers
//!
//! Kept in its own test binary: it installs the global metrics recorder and no
//! other dispatcher may write the same gauges meanwhile.

use std::sync::Arc;
use std::thread;

use contracts::{CheckIn, PriorityClass};
use dispatcher::Dispatcher;
use metrics_exporter_prometheus::PrometheusBuilder;

fn gauge_value(rendered: &str, series: &str) -> f64 {
    rendered
        .lines()
        .find(|line| line.starts_with(series))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| panic!("series {series} missing from:\n{rendered}"))
}

#[test]
fn test_queue_depth_gauges_match_final_state() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    assert!(metrics::set_global_recorder(recorder).is_ok());

    let dispatcher = Arc::new(Dispatcher::default());
    let workers: Vec<_> = (0..8)
        .map(|t| {
            let d = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..500 {
                    let class = if (t + i) % 2 == 0 {
                        PriorityClass::High
                    } else {
                        PriorityClass::Normal
                    };
                    d.enqueue(CheckIn::new(format!("c{t}-{i}"), format!("{t}{i}"), class));
                    if i % 3 == 0 {
                        d.dequeue_next();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let snapshot = dispatcher.snapshot();
    let rendered = handle.render();
    assert_eq!(
        gauge_value(&rendered, "service_scheduler_queue_depth{class=\"HIGH\"}"),
        snapshot.high_waiting as f64
    );
    assert_eq!(
        gauge_value(&rendered, "service_scheduler_queue_depth{class=\"NORMAL\"}"),
        snapshot.normal_waiting as f64
    );
    assert_eq!(
        gauge_value(&rendered, "service_scheduler_last_issued"),
        snapshot.last_issued as f64
    );
}
