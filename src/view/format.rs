use super::types::{StatusLabel, CAPTURING_COLOR, IDLE_COLOR};

const BYTES_PER_MEBIBYTE: u128 = 1024 * 1024;

/// Groups digits by thousands with a comma, `1500` -> `1,500`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Byte count in mebibytes with two decimals, `2097152` -> `2.00 MB`.
///
/// Exact ties round up (`131072` -> `0.13 MB`), computed on integers so that no float
/// tie-breaking rule applies.
pub fn format_megabytes(bytes: u64) -> String {
    let hundredths = (bytes as u128 * 100 + BYTES_PER_MEBIBYTE / 2) / BYTES_PER_MEBIBYTE;
    format!("{}.{:02} MB", hundredths / 100, hundredths % 100)
}

/// Total seconds as `HH:MM:SS`. Hours are not wrapped at 24 and may use more than two digits.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn status_label(is_capturing: bool) -> StatusLabel {
    if is_capturing {
        StatusLabel {
            text: "Capturing".to_string(),
            color: CAPTURING_COLOR.to_string(),
        }
    } else {
        StatusLabel {
            text: "Idle".to_string(),
            color: IDLE_COLOR.to_string(),
        }
    }
}
