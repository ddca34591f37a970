use boxclaim::domain::{decide, format_remaining, format_timestamp, CycleDecision};
use boxclaim::{Clock, Components};
use tracing::info;

use crate::main_runtime::shutdown_signal;

pub async fn run_loop(components: Components) {
    info!(
        "Starting auto-claim loop (cooldown window: {})",
        format_remaining(components.cooldown_window.as_millis() as i64)
    );

    tokio::select! {
        _ = components.scheduler.run() => {},
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping claim loop");
        }
    }
}

pub async fn run_once(components: Components) {
    tokio::select! {
        report = components.scheduler.run_cycle() => {
            let states: Vec<&str> = report.states.iter().map(|s| s.as_str()).collect();
            println!("States:  {}", states.join(" -> "));
            if let Some(wait) = report.wait_remaining {
                println!("Waited:  {}", format_remaining(wait.as_millis() as i64));
            }
            match &report.outcome {
                Some(outcome) if outcome.succeeded => {
                    println!("Claim:   succeeded via {}", outcome.path);
                    if let Some(tx_hash) = &outcome.transaction_reference {
                        println!("Tx hash: {}", tx_hash);
                    }
                }
                _ => println!("Claim:   failed on every path"),
            }
            if let Some(credited) = report.credited {
                println!("Credit:  {}", if credited { "applied" } else { "failed" });
            }
            if let Some(status) = report.status {
                println!("{}", status);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, cycle abandoned");
        }
    }
}

pub async fn show_status(components: &Components) {
    let status = components.ledger.rank_and_score(&components.identity).await;
    println!("Identity: {}", components.identity);
    println!("{}", status);
}

pub async fn show_cooldown(components: &Components) {
    let cooldown = components.tracker.fetch_cooldown(&components.identity).await;
    let now_ms = components.clock.now_ms();

    println!("Identity: {}", components.identity);
    match cooldown.last_open_ms {
        Some(last) => println!("Last open at: {}", format_timestamp(last)),
        None => println!("Last open at: unknown"),
    }

    match decide(cooldown, now_ms, components.cooldown_window) {
        CycleDecision::ClaimNow => println!("Eligible now"),
        CycleDecision::Wait(wait) => {
            println!("Next claim at: {}", format_timestamp(wait.next_eligible_ms));
            println!(
                "Remaining: {}",
                format_remaining(wait.remaining_at(now_ms).as_millis() as i64)
            );
        }
    }
}
