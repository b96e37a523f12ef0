use geosweep::ResultEncoder;

/// One `GPS` log line with the 15 comma-separated fields the parser expects.
pub fn gps_line(time_us: i64, status: i64, lat: f64, lon: f64, alt: f64) -> String {
    let week_ms = time_us / 1_000;
    format!(
        "GPS, {}, {}, {}, 14, 2279, 0.74, 1, {:.7}, {:.7}, {:.2}, 0.12, 87.4, -0.05, 1",
        time_us, week_ms, status, lat, lon, alt
    )
}

/// One sweep line in the same encoding the result encoder emits.
pub fn sweep_line(time_rel: f64, freq_min: i64, freq_max: i64, powers: &[f64]) -> String {
    ResultEncoder::encode_parts(time_rel, freq_min, freq_max, powers)
}
