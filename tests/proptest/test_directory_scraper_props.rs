//! Property-based tests for the directory scraper

use cmifloppy::directory::{DirectoryScraper, MAX_ROWS};
use proptest::prelude::*;

fn scraper() -> DirectoryScraper {
    DirectoryScraper::with_terminator("\n")
}

fn sample_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,7}"
}

fn listing(names: &[String]) -> String {
    let mut text = String::from("fnr  name\n------------\n");
    for (i, name) in names.iter().enumerate() {
        text.push_str(&format!("{:3}  {:<8}.VC\n", i + 1, name));
    }
    text.push_str("------------\n");
    text
}

proptest! {
    #[test]
    fn test_scraper_never_panics(s in "\\PC*") {
        let _ = scraper().scrape(&s);
    }

    #[test]
    fn test_scraper_ignores_arbitrary_noise(s in "[^-\n]{0,200}") {
        prop_assert!(scraper().scrape(&s).is_empty());
    }

    #[test]
    fn test_listing_names_round_trip(names in prop::collection::vec(sample_name(), 0..MAX_ROWS)) {
        let entries = scraper().scrape(&listing(&names));
        let scraped: Vec<String> = entries.into_iter().map(|e| e.name).collect();
        let expected: Vec<String> = names.iter().map(|n| format!("{}.VC", n)).collect();
        prop_assert_eq!(scraped, expected);
    }

    #[test]
    fn test_last_listing_wins(
        first in prop::collection::vec(sample_name(), 0..10),
        second in prop::collection::vec(sample_name(), 1..10),
        noise in "[a-z> ]{0,30}",
    ) {
        let text = format!("{}{}\n{}", listing(&first), noise, listing(&second));
        let scraped: Vec<String> = scraper().scrape(&text).into_iter().map(|e| e.name).collect();
        let expected: Vec<String> = second.iter().map(|n| format!("{}.VC", n)).collect();
        prop_assert_eq!(scraped, expected);
    }
}
