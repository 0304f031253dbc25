const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Render a byte count as `"<value> <unit>"` with at most two decimals.
///
/// Counts at or beyond 1024 GB stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Substring after the last `.` of `file_name`, or `""` when there is none
/// or the dot is the final character.
pub fn get_file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index + 1..],
        None => "",
    }
}
