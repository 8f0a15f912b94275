/// `m:ss`, minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn format_distance(km: f64) -> String {
    format!("{:.2}", km)
}
