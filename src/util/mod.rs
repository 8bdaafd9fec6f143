/// Block appended to a note body when the user asks for a summary, matching
/// what the backend strips back out when re-summarizing.
pub(crate) const SUMMARY_DELIMITER: &str = "\n\n---\nSummary:\n";

pub(crate) fn append_summary_block(content: &str, summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() {
        return content.to_string();
    }
    format!("{content}{SUMMARY_DELIMITER}{summary}")
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `2024-01-15T09:30:00.000Z` -> `15 Jan 2024` (the card date format).
///
/// Falls back to the raw string when the value doesn't look like an ISO
/// date; the server owns the field and we never fail a render over it.
pub(crate) fn format_created_at(iso: &str) -> String {
    let date = iso.split('T').next().unwrap_or(iso);
    let mut parts = date.splitn(3, '-');

    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return iso.to_string();
    };

    let (Ok(year), Ok(month), Ok(day)) = (y.parse::<u16>(), m.parse::<u8>(), d.parse::<u8>())
    else {
        return iso.to_string();
    };

    if !(1..=12).contains(&month) {
        return iso.to_string();
    }

    format!("{:02} {} {}", day, MONTHS[(month - 1) as usize], year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_created_at_iso() {
        assert_eq!(format_created_at("2024-01-15T09:30:00.000Z"), "15 Jan 2024");
        assert_eq!(format_created_at("2023-12-01T00:00:00Z"), "01 Dec 2023");
    }

    #[test]
    fn test_format_created_at_date_only() {
        assert_eq!(format_created_at("2024-06-07"), "07 Jun 2024");
    }

    #[test]
    fn test_format_created_at_falls_back_on_garbage() {
        assert_eq!(format_created_at(""), "");
        assert_eq!(format_created_at("yesterday"), "yesterday");
        assert_eq!(format_created_at("2024-13-01"), "2024-13-01");
    }

    #[test]
    fn test_append_summary_block() {
        let out = append_summary_block("body", "  key points  ");
        assert_eq!(out, "body\n\n---\nSummary:\nkey points");
    }

    #[test]
    fn test_append_summary_block_empty_summary_is_noop() {
        assert_eq!(append_summary_block("body", "   "), "body");
    }
}
