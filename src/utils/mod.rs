use url::Url;

/// Last non-empty path segment of `url`, percent-decoding left as is.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Human readable transfer rate, e.g. `"512 KByte/s"`
pub fn format_rate(bytes_per_second: f64) -> String {
    format!("{} KByte/s", (bytes_per_second / 1000.0).max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        let url = Url::parse("https://example.com/download/EA-1/Windows-Yuzu-EA-1.zip").unwrap();
        assert_eq!(
            file_name_from_url(&url),
            Some("Windows-Yuzu-EA-1.zip".to_string())
        );

        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(file_name_from_url(&url), None);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0 KByte/s");
        assert_eq!(format_rate(1_536_000.0), "1536 KByte/s");
        assert_eq!(format_rate(999.0), "0 KByte/s");
    }
}
