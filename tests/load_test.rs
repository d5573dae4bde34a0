//! Load testing for the gateway.

use colorapp::{ColorTellerConfig, GatewayConfig, Shutdown};
use std::time::{Duration, Instant};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_load_performance() {
    // 1. Colorteller with a small artificial latency
    let shutdown = Shutdown::new();
    let teller = common::start_color_teller(
        ColorTellerConfig {
            color: "blue".into(),
            response_delay_ms: 5,
            ..ColorTellerConfig::default()
        },
        &shutdown,
    )
    .await;

    // 2. Gateway in front of it
    let (gateway, stats) = common::start_gateway(GatewayConfig::new(teller.to_string()), &shutdown).await;

    // 3. Run Load Test (stays within the history capacity)
    let concurrency = 20;
    let requests_per_task = 40;
    let total_requests = concurrency * requests_per_task;

    let client = reqwest::Client::new();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = format!("http://{}/color", gateway);
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    if all_latencies.is_empty() {
        panic!("No successful requests recorded");
    }

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p95 = all_latencies[(all_latencies.len() as f64 * 0.95) as usize];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("P99 Latency:    {:?}", p99);
    println!("Success Rate:   {}/{}", all_latencies.len(), total_requests);
    println!("-------------------------\n");

    assert_eq!(all_latencies.len(), total_requests);
    assert_eq!(stats.snapshot().len(), total_requests);
    assert!(p50 >= Duration::from_millis(5));

    shutdown.trigger();
}
