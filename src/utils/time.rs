use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// True once `now` has reached `deadline`
pub fn has_passed(deadline: i64, now: i64) -> bool {
    now >= deadline
}
