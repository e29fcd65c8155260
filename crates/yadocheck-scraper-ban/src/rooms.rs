//! Room catalog for Miyamaso Takamiya (489ban.net booking backend)
//!
//! Only rooms with genuine natural hot spring water in their private baths
//! are watched. The hotel has nine room types; these three are the ones
//! with real in-room onsen.

use yadocheck_core::RoomInfo;

/// 489ban room id for the HINAKURA detached villa
pub const HINAKURA: &str = "25112";
/// 489ban room id for the Rian Sansui maisonette variant
pub const RIAN_MAISONETTE: &str = "25114";
/// 489ban room id for the Rian Sansui Japanese-style variant
pub const RIAN_JAPANESE: &str = "25113";

/// Full Miyamaso room catalog, in display order
pub fn catalog() -> Vec<RoomInfo> {
    vec![
        RoomInfo::new(HINAKURA, "HINAKURA Villa (Private Onsen Suite, 110m2)", 4, true),
        RoomInfo::new(RIAN_MAISONETTE, "Rian Sansui Maisonette (Private Onsen, 51m2)", 4, true),
        RoomInfo::new(RIAN_JAPANESE, "Rian Sansui Japanese (Private Onsen, 51m2)", 4, true),
    ]
}

/// Resolve a user-friendly room alias to catalog room ids
///
/// `rian` and its spellings expand to both Rian Sansui variants. Unknown
/// aliases return an empty vec.
pub fn resolve_alias(alias: &str) -> Vec<&'static str> {
    match alias.trim().to_lowercase().as_str() {
        "hinakura" | "hina" | "villa" => vec![HINAKURA],
        "rian" | "rian-sansui" | "rian_sansui" | "sansui" => vec![RIAN_MAISONETTE, RIAN_JAPANESE],
        "rian-maisonette" | "rian_maisonette" | "maisonette" => vec![RIAN_MAISONETTE],
        "rian-japanese" | "rian_japanese" | "rian-jp" => vec![RIAN_JAPANESE],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rooms_all_have_private_onsen() {
        let rooms = catalog();
        assert_eq!(rooms.len(), 3);
        assert!(rooms.iter().all(|r| r.has_private_bath));
        assert!(rooms.iter().all(|r| r.max_guests == 4));
    }

    #[test]
    fn rian_expands_to_both_variants() {
        assert_eq!(resolve_alias("rian"), vec![RIAN_MAISONETTE, RIAN_JAPANESE]);
        assert_eq!(resolve_alias("Sansui"), vec![RIAN_MAISONETTE, RIAN_JAPANESE]);
        assert_eq!(resolve_alias("maisonette"), vec![RIAN_MAISONETTE]);
        assert_eq!(resolve_alias("villa"), vec![HINAKURA]);
        assert!(resolve_alias("sakura").is_empty());
    }
}
