use anyhow::Result;
use std::env;
use std::time::{Duration, Instant};
use tracing::info;

pub fn stats_enabled() -> bool {
    matches!(env::var("ASMQC_STATS").as_deref(), Ok("1"))
}

pub fn stage<T, F>(stats: bool, name: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let t = Instant::now();
    let res = f();
    stage_done(stats, name, t);
    res
}

pub fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        info!("ASMQC_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

/// Milliseconds under one second, seconds with three decimals above.
pub fn fmt_dur(d: Duration) -> String {
    match d.as_millis() {
        ms @ 0..=999 => format!("{ms}ms"),
        _ => format!("{:.3}s", d.as_secs_f64()),
    }
}
