use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for created habits.
pub fn increment_habit_created() {
    counter!("habits_created_total").increment(1);
}

/// Count a recorded check-in and track the streak it produced.
pub fn record_checkin(streak: i32) {
    counter!("checkins_recorded_total").increment(1);
    histogram!("checkin_streak_length").record(f64::from(streak));
}

/// Count a refused check-in by reason.
pub fn increment_checkin_rejected(reason: &'static str) {
    counter!("checkins_rejected_total", "reason" => reason).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
