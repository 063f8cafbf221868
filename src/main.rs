//! circuit-guard demonstration driver.
//!
//! Runs a breaker against three stand-in services and prints every outcome and
//! state transition:
//! - healthy: always answers quickly
//! - slow: never answers within the timeout
//! - intermittent: slow for the first few calls, then healthy

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use clap::{Parser, Subcommand};

use circuit_guard::config::load_settings;
use circuit_guard::observability::{init_logging, LogFormat, LoggingConfig};
use circuit_guard::resilience::BoxError;
use circuit_guard::{
    BreakerConfig, BreakerObserver, BreakerSettings, CallOutcome, CircuitBreaker, Transition,
};

const HEALTHY_CONTENT: &str = "A healthy service gives a fast response";
const RECOVERED_CONTENT: &str = "This is a healthy fast response";
const FALLBACK_CONTENT: &str = "Relying on a fallback cached content";

#[derive(Parser)]
#[command(name = "circuit-guard")]
#[command(about = "Demonstration runs of the circuit breaker", long_about = None)]
struct Cli {
    /// Breaker settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Pretty multi-line log output.
    #[arg(long)]
    pretty: bool,

    /// Print the breaker snapshot as JSON after each scenario.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    scenario: Scenario,
}

#[derive(Subcommand, Clone, Copy)]
enum Scenario {
    /// Service that always answers
    Healthy,
    /// Service that always exceeds the timeout
    Slow,
    /// Service that is slow three times, then recovers
    Intermittent,
    /// Run every scenario in turn
    All,
}

/// Prints transitions as they happen.
struct TransitionPrinter;

impl BreakerObserver for TransitionPrinter {
    fn on_state_changed(&self, transition: &Transition) {
        println!("--- circuit state changed ({} -> {}) ---", transition.from, transition.to);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        format: if cli.pretty { LogFormat::Pretty } else { LogFormat::Compact },
    })?;

    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => demo_settings(),
    };

    tracing::info!(
        timeout_ms = settings.timeout_ms,
        grace_period_ms = settings.grace_period_ms,
        failure_threshold = settings.failure_threshold,
        "Settings loaded"
    );

    let scenarios: &[Scenario] = match cli.scenario {
        Scenario::All => &[Scenario::Healthy, Scenario::Slow, Scenario::Intermittent],
        _ => std::slice::from_ref(&cli.scenario),
    };

    for scenario in scenarios {
        let breaker = match scenario {
            Scenario::Healthy => run_healthy(&settings).await?,
            Scenario::Slow => run_slow(&settings).await?,
            Scenario::Intermittent => run_intermittent(&settings).await?,
            Scenario::All => continue,
        };
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&breaker.snapshot())?);
        }
    }

    Ok(())
}

fn demo_settings() -> BreakerSettings {
    BreakerSettings {
        name: "demo".to_string(),
        timeout_ms: 200,
        grace_period_ms: 1000,
        ..BreakerSettings::default()
    }
}

async fn run_healthy(
    settings: &BreakerSettings,
) -> Result<Arc<CircuitBreaker<String>>, Box<dyn std::error::Error>> {
    print_head("My Always Healthy Service");
    let breaker = build(
        BreakerConfig::from_settings(settings).target(|| async {
            Ok::<_, BoxError>(Some(HEALTHY_CONTENT.to_string()))
        }),
    )?;

    for _ in 0..3 {
        print_outcome(&breaker.call().await);
    }
    Ok(breaker)
}

async fn run_slow(
    settings: &BreakerSettings,
) -> Result<Arc<CircuitBreaker<String>>, Box<dyn std::error::Error>> {
    print_head("My Always Slow Service");
    let breaker = build(
        BreakerConfig::from_settings(settings).target(|| async {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok::<_, BoxError>(Some("This is a veeery slooow response".to_string()))
        }),
    )?;
    set_trip_printer(&breaker);

    drive(&breaker, settings).await;
    Ok(breaker)
}

async fn run_intermittent(
    settings: &BreakerSettings,
) -> Result<Arc<CircuitBreaker<String>>, Box<dyn std::error::Error>> {
    print_head("My Intermittently Slow Service");
    let countdown = Arc::new(AtomicU32::new(3));
    let breaker = build(
        BreakerConfig::from_settings(settings).target(move || {
            let countdown = countdown.clone();
            async move {
                let slow = countdown
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
                if slow {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    return Ok::<_, BoxError>(Some("This is a slow response".to_string()));
                }
                Ok(Some(RECOVERED_CONTENT.to_string()))
            }
        }),
    )?;
    set_trip_printer(&breaker);

    let weak = Arc::downgrade(&breaker);
    breaker.set_on_reset(move || {
        if let Some(breaker) = weak.upgrade() {
            println!("--- circuit reset ({} failures) ---", breaker.failure_count());
        }
    });

    drive(&breaker, settings).await;
    Ok(breaker)
}

/// Attach the fallback and the printer, then build the breaker.
fn build(
    config: BreakerConfig<String>,
) -> Result<Arc<CircuitBreaker<String>>, Box<dyn std::error::Error>> {
    let config =
        config.fallback(|| async { Ok::<_, BoxError>(Some(FALLBACK_CONTENT.to_string())) });
    let breaker = Arc::new(CircuitBreaker::new(config)?);
    breaker.add_observer(Arc::new(TransitionPrinter));
    Ok(breaker)
}

fn set_trip_printer(breaker: &Arc<CircuitBreaker<String>>) {
    let weak: Weak<CircuitBreaker<String>> = Arc::downgrade(breaker);
    breaker.set_on_trip(move || {
        if let Some(breaker) = weak.upgrade() {
            println!("--- circuit tripped ({} failures) ---", breaker.failure_count());
        }
    });
}

/// Ten calls, pausing past the grace period after the 6th and 8th.
async fn drive(breaker: &CircuitBreaker<String>, settings: &BreakerSettings) {
    let pause = Duration::from_millis(settings.grace_period_ms + settings.grace_period_ms / 2);
    for i in 0..10 {
        print_outcome(&breaker.call().await);

        if i == 5 || i == 7 {
            println!("--- awaiting {} ms ---", pause.as_millis());
            tokio::time::sleep(pause).await;
            println!("--- circuit state ({}) ---", breaker.state());
        }
    }
}

fn print_head(head: &str) {
    println!("\n###\n{}", head);
}

fn print_outcome(outcome: &CallOutcome<String>) {
    match &outcome.error {
        Some(err) => println!(
            "ERROR: {} (content={:?}, via_fallback={})",
            err, outcome.content, outcome.via_fallback
        ),
        None => println!(
            "CONTENT: {} (via_fallback={})",
            outcome.content.as_deref().unwrap_or_default(),
            outcome.via_fallback
        ),
    }
}
