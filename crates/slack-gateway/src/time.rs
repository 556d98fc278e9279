use chrono::DateTime;

const ISO_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Renders a Slack `ts` string (seconds with fractional precision) as an
/// ISO-8601 UTC timestamp with millisecond precision.
///
/// The raw `ts` stays authoritative; this rendering floors to whole
/// milliseconds, so sub-millisecond precision is lost by design.
pub fn ts_to_iso8601(ts: &str) -> Option<String> {
    let seconds: f64 = ts.trim().parse().ok()?;
    let millis = (seconds * 1000.0).floor() as i64;
    let rendered = DateTime::from_timestamp_millis(millis)?;
    Some(rendered.format(ISO_MILLIS_FORMAT).to_string())
}

/// Renders an epoch-seconds value as an ISO-8601 UTC timestamp.
pub fn epoch_to_iso8601(seconds: i64) -> Option<String> {
    let rendered = DateTime::from_timestamp(seconds, 0)?;
    Some(rendered.format(ISO_MILLIS_FORMAT).to_string())
}
