use axum::response::Json;
use once_cell::sync::Lazy;
use serde_json::json;
use std::time::{Duration, Instant};

pub static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

fn format_uptime(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": format!("Portal backend is running! Uptime: {}", format_uptime(START_TIME.elapsed()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_uses_the_largest_unit() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 61)), "3h 1m 1s");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }
}
