//! Room-page parsing for 489ban.net
//!
//! Each room has its own stay page, so parsing here works on one room at a
//! time: sold-out markers win, then an in-band price implies a bookable
//! plan, then a reservation button is accepted as a weaker signal.

use regex::Regex;

/// Markers meaning the room cannot be booked for the requested stay
const UNAVAILABLE_MARKERS: &[&str] = &[
    "sold out",
    "no vacancy",
    "満室",
    "完売",
    "予約できません",
    "this plan is sold out",
];

/// Words that appear on reservation buttons when plans are open
const AVAILABLE_MARKERS: &[&str] = &["details", "reservations", "予約", "詳細", "book now", "reserve"];

/// Plausible per-person price band in yen for these premium rooms
const PRICE_MIN: u32 = 15_000;
const PRICE_MAX: u32 = 150_000;

/// Parse one room page into (available, price_per_person)
pub fn parse_room_page(content: &str) -> (bool, Option<u32>) {
    let content_lower = content.to_lowercase();

    for marker in UNAVAILABLE_MARKERS {
        if content_lower.contains(marker) {
            return (false, None);
        }
    }

    if let Some(price) = parse_price(content) {
        return (true, Some(price));
    }

    // No price on the page; a reservation button or link still means a
    // plan can be opened
    (has_reservation_button(content, &content_lower), None)
}

/// Find a plan price in any of the formats 489ban renders
///
/// Prices appear as `29,700 JPY`, `¥29,700`, or `29,700円` depending on
/// locale. Out-of-band numbers (tax lines, totals for multiple nights)
/// are skipped rather than trusted.
pub fn parse_price(content: &str) -> Option<u32> {
    let patterns = [
        r"(?i)([0-9,]+)\s*JPY",
        r"[¥￥]([0-9,]+)",
        r"([0-9,]+)\s*円",
    ];

    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        for caps in re.captures_iter(content) {
            if let Ok(price) = caps[1].replace(',', "").parse::<u32>() {
                if (PRICE_MIN..=PRICE_MAX).contains(&price) {
                    return Some(price);
                }
            }
        }
    }
    None
}

fn has_reservation_button(content: &str, content_lower: &str) -> bool {
    for marker in AVAILABLE_MARKERS {
        if !content_lower.contains(marker) {
            continue;
        }
        // Only count the marker when it sits inside a clickable element
        let patterns = [
            format!("(?i)<button[^>]*>[^<]*{}", regex::escape(marker)),
            format!("(?i)<a[^>]*>[^<]*{}", regex::escape(marker)),
            format!(r#"(?i)class="[^"]*btn[^"]*"[^>]*>[^<]*{}"#, regex::escape(marker)),
        ];
        for pattern in &patterns {
            if Regex::new(pattern).is_ok_and(|re| re.is_match(content)) {
                return true;
            }
        }
    }
    false
}
