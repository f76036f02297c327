//! Human-readable durations for user-facing messages ("try again in 4m 10s").

/// Two most significant units, zero sub-units omitted.
pub fn format_duration(secs: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let Some(first) = UNITS.iter().position(|(size, _)| secs >= *size) else {
        return "0s".to_string();
    };
    let (size, label) = UNITS[first];
    let mut out = format!("{}{label}", secs / size);
    if let Some(&(next, next_label)) = UNITS.get(first + 1) {
        let rest = (secs % size) / next;
        if rest > 0 {
            out.push_str(&format!(" {rest}{next_label}"));
        }
    }
    out
}
