//! Unit tests for the directory listing scraper
//!
//! Listings are built with `\n` and scraped with an explicit terminator so
//! the tests behave the same on every host.

use cmifloppy::directory::{extract_name, scrape_directory, DirectoryScraper, MAX_ROWS};
use cmifloppy::platform::Platform;

fn scrape(text: &str) -> Vec<String> {
    DirectoryScraper::with_terminator("\n")
        .scrape(text)
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

fn listing(rows: &[&str]) -> String {
    let mut text = String::from("fnr  name        blocks\n----------------------\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text.push_str("----------------------\n");
    text
}

#[cfg(test)]
mod scraper_tests {
    use super::*;

    #[test]
    fn test_fixed_width_rows() {
        let text = listing(&["FOO       .VC", "BARBAZ    .VC"]);
        assert_eq!(scrape(&text), vec!["FOO.VC", "BARBAZ.VC"]);
    }

    #[test]
    fn test_newest_frame_wins() {
        let mut text = listing(&["  1  OLD     .VC"]);
        text.push_str("> rm OLD.VC\n");
        text.push_str(&listing(&["  1  NEW     .VC", "  2  OTHER   .VC"]));
        assert_eq!(scrape(&text), vec!["NEW.VC", "OTHER.VC"]);
    }

    #[test]
    fn test_text_without_frames() {
        assert!(scrape("").is_empty());
        assert!(scrape("CMI OS9 Version 2.1\n>\n").is_empty());
        assert!(scrape("ERROR: unknown command ls\n").is_empty());
    }

    #[test]
    fn test_listing_surrounded_by_noise() {
        let text = format!(
            "> dir\nERROR: disk slow\n{}> \n",
            listing(&["  1  STRINGS .VC"])
        );
        assert_eq!(scrape(&text), vec!["STRINGS.VC"]);
    }

    #[test]
    fn test_truncated_newest_frame_falls_back_to_previous() {
        let mut text = listing(&["  1  KEEP    .VC"]);
        text.push_str("fnr  name\n--------\n  1  PARTIAL .VC\n");
        assert_eq!(scrape(&text), vec!["KEEP.VC"]);
    }

    #[test]
    fn test_row_with_foreign_characters_breaks_frame() {
        let text = listing(&["  1  PIANO   .VC", "  2  BAD*    .VC"]);
        assert!(scrape(&text).is_empty());
    }

    #[test]
    fn test_maximum_rows() {
        let rows: Vec<String> = (0..MAX_ROWS).map(|i| format!("{:3}  S{:<6} .VC", i, i)).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        assert_eq!(scrape(&listing(&refs)).len(), MAX_ROWS);

        let rows: Vec<String> = (0..=MAX_ROWS).map(|i| format!("{:3}  S{:<6} .VC", i, i)).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        assert!(scrape(&listing(&refs)).is_empty());
    }

    #[test]
    fn test_windows_terminator() {
        let text = listing(&["  1  PIANO   .VC"]).replace('\n', "\r\n");
        let entries = DirectoryScraper::with_terminator("\r\n").scrape(&text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "PIANO.VC");
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("  3  KICK    .VC  "), "KICK.VC");
        assert_eq!(extract_name("12  ABCDEFGH.VC"), "ABCDEFGH.VC");
        assert_eq!(extract_name("SHORT"), "SHORT");
        assert_eq!(extract_name(""), "");
    }

    #[test]
    fn test_extract_name_keeps_token_touching_name_field() {
        // The cut never splits a token, so a fused column stays with the name
        assert_eq!(extract_name("12ABCDEFGH.VC"), "12ABCDEFGH.VC");
        assert_eq!(extract_name("  7 99ABCDEFGH.VC"), "99ABCDEFGH.VC");
        assert_eq!(extract_name("  7 99 ABCDEFGH.VC"), "ABCDEFGH.VC");
    }

    #[test]
    fn test_scrape_directory_uses_host_terminator() {
        let text = listing(&["  1  PIANO   .VC", "  2  KICK    .VC"])
            .replace('\n', Platform::line_terminator());
        let names: Vec<String> = scrape_directory(&text)
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["PIANO.VC", "KICK.VC"]);
    }
}
