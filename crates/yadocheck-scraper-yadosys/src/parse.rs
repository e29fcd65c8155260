//! Result-page parsing for the Yadosys plan list
//!
//! One search submission returns a single page covering every room, so all
//! parsing here is pure functions over that page's HTML text. Yadosys mixes
//! Japanese and English markers depending on the visitor locale; both sets
//! are recognized.

use regex::Regex;
use yadocheck_core::{RoomAvailability, RoomInfo};

/// Markers meaning the room cannot be booked
const UNAVAILABLE_MARKERS: &[&str] = &["×", "満室", "sold out", "unavailable", "no vacancy"];

/// Markers meaning the room can be booked
const AVAILABLE_MARKERS: &[&str] = &["○", "◎", "空室", "available", "vacancy"];

/// Plausible per-person price band in yen; matches outside it are noise
/// (tax lines, campaign banners, phone numbers)
const PRICE_MIN: u32 = 10_000;
const PRICE_MAX: u32 = 100_000;

/// Parse one room's availability out of the shared results page
pub fn parse_room(content: &str, room: &RoomInfo) -> RoomAvailability {
    if !mentions_room(content, room) {
        // Room absent from the results entirely: report it, as unavailable
        return RoomAvailability::unavailable(room.clone());
    }

    let mut available = false;

    // An unavailability marker adjacent to the room name wins outright
    let explicitly_unavailable = UNAVAILABLE_MARKERS
        .iter()
        .any(|marker| marker_near_room(content, &room.name, marker));
    if !explicitly_unavailable {
        available = AVAILABLE_MARKERS.iter().any(|m| content.contains(m));
    }

    let price = parse_price_near(content, &room.name);
    let spots_left = parse_spots_left(content);

    // A concrete in-band price implies a bookable plan even when the page
    // skipped the status glyph
    if !available && !explicitly_unavailable && price.is_some() {
        available = true;
    }

    RoomAvailability {
        room: room.clone(),
        available,
        price_per_person: price,
        spots_left,
    }
}

/// Whether the page mentions the room by name or backend id
pub fn mentions_room(content: &str, room: &RoomInfo) -> bool {
    content.to_lowercase().contains(&room.name.to_lowercase()) || content.contains(&room.id)
}

fn marker_near_room(content: &str, room_name: &str, marker: &str) -> bool {
    let name = regex::escape(room_name);
    let marker = regex::escape(marker);
    let pattern = format!("(?is){name}.*?{marker}|{marker}.*?{name}");
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(content),
        Err(_) => false,
    }
}

/// Find a yen price associated with the room, preferring matches adjacent
/// to the room name over page-wide ones
fn parse_price_near(content: &str, room_name: &str) -> Option<u32> {
    let name = regex::escape(room_name);
    let patterns = [
        format!("(?is){name}.*?[¥￥]([0-9,]+)"),
        format!("(?is)[¥￥]([0-9,]+).*?{name}"),
        "(?is)[¥￥]([0-9,]+)".to_string(),
    ];

    for pattern in &patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(content) {
            if let Ok(price) = caps[1].replace(',', "").parse::<u32>() {
                if (PRICE_MIN..=PRICE_MAX).contains(&price) {
                    return Some(price);
                }
            }
        }
    }
    None
}

/// Find a "N rooms left" style counter anywhere on the page
fn parse_spots_left(content: &str) -> Option<u32> {
    let re = Regex::new(r"(?i)(\d+)\s*(?:rooms?|left|remaining|組|室)").ok()?;
    let caps = re.captures(content)?;
    caps[1].parse().ok()
}
