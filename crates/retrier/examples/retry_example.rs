//! Example: Wrapping unreliable operations with the retry executor
//!
//! This example demonstrates:
//! 1. Simple retry with binary backoff and a log sink
//! 2. Custom retry predicate (only retry network errors)
//! 3. Jitter impact (run multiple times to see variance)
//! 4. Async retries and settings loaded from the environment
//!
//! Run with:
//! ```bash
//! RUST_LOG=retrier=debug cargo run -p retrier --example retry_example
//! ```

use retrier::prelude::*;
use retrier::RetrySettings;
use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
        }
    }

    fn call(&self) -> Result<String, io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!(
                "  Attempt {}: FAILED (simulating transient error)",
                attempt + 1
            );
            Err(io::Error::other(format!(
                "network error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Simple retry with binary backoff
fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Simple Retry with Binary Backoff ===\n");

    let api = UnreliableApi::new(2); // Fail first 2 attempts
    let op = retry(
        || api.call(),
        [
            max_retries(3),
            base_delay(Duration::from_millis(100)),
            log(LogSink::new(|args| println!("  [retrier] {args}"))),
        ],
    );

    println!("Calling unreliable API (will fail 2 times before succeeding)...");
    let start = Instant::now();
    let result = op.call()?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 0ms (attempt 1) + 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: Custom retry predicate (only retry network errors)
fn example_custom_predicate() {
    println!("\n=== Example 2: Custom Retry Predicate (Network Errors Only) ===\n");

    let network_only = || {
        should_retry(|err: &io::Error| err.to_string().to_lowercase().contains("network"))
    };

    println!("Test 1: Auth error (should NOT retry)");
    let op = retry(
        || {
            Err::<(), _>(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "auth failed",
            ))
        },
        [network_only(), base_delay(Duration::from_millis(10))],
    );
    match op.call() {
        Err(err) => println!("  {err}"),
        Ok(()) => unreachable!("auth errors never succeed"),
    }

    println!("\nTest 2: Network error (should retry)");
    let api = UnreliableApi::new(2);
    let op = retry(
        || api.call(),
        [
            network_only(),
            max_retries(3),
            base_delay(Duration::from_millis(10)),
        ],
    );
    println!("  Result: {:?}", op.call().map_err(|e| e.to_string()));
    println!("Total attempts: {}", api.total_attempts());

    println!("\nTest 3: Network error past the limit");
    let api = UnreliableApi::new(u32::MAX);
    let op = retry(
        || api.call(),
        [network_only(), max_retries(2), base_delay(Duration::from_millis(10))],
    );
    if let Err(err) = op.call() {
        println!("  {err}");
    }
}

/// Example 3: Jitter demonstration
fn example_jitter_impact() {
    println!("\n=== Example 3: Jitter Impact (Run 10 Times) ===\n");

    let run = |label: &str, jitter: f64| {
        println!("{label} (10 runs):");
        let mut total = Duration::ZERO;
        for i in 0..10 {
            let api = UnreliableApi::new(1);
            let op = retry(
                || api.call(),
                [
                    max_retries(1),
                    base_delay(Duration::from_millis(100)),
                    calculate_delay(Jittered::new(Binary, jitter)),
                ],
            );

            let start = Instant::now();
            let _ = op.call();
            let elapsed = start.elapsed();
            total += elapsed;
            println!("  Run {}: {:?}", i + 1, elapsed);
        }
        total / 10
    };

    let avg_no_jitter = run("Without jitter", 0.0);
    let avg_with_jitter = run("\nWith 30% jitter", 0.3);

    println!("\nAnalysis:");
    println!("  No jitter: All delays should be very similar (~100ms)");
    println!("  With jitter: Delays should vary (70-130ms range)");
    println!("  Average without jitter: {:?}", avg_no_jitter);
    println!("  Average with jitter: {:?}", avg_with_jitter);
}

/// Example 4: Async retries configured from RETRIER_* variables
async fn example_async_from_env() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Async Retry with Settings from the Environment ===\n");

    let settings = RetrySettings::from_env()?;
    println!("Settings: {:?}", settings);

    let api = UnreliableApi::new(1);
    let api = &api;
    let mut overrides = settings.into_overrides()?;
    overrides.push(log(LogSink::tracing()));

    let op = retry_async(move || async move { api.call() }, overrides);
    let result = op.call().await?;

    println!("Result: {}", result);
    println!("Total attempts: {}", api.total_attempts());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   Retrier: Retry Executor Examples");
    println!("==============================================");

    example_simple_retry()?;
    example_custom_predicate();
    example_jitter_impact();
    example_async_from_env().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
