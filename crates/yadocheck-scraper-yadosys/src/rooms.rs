//! Room catalog for Miyakowasure (Yadosys booking backend)
//!
//! Room ids are the zero-padded codes the Yadosys plan list uses. The inn
//! has shared onsen baths only, so no room carries the private-bath flag.

use yadocheck_core::RoomInfo;

/// Yadosys room id for SAKURA-KAN (river view)
pub const SAKURA_RIVER: &str = "00001";
/// Yadosys room id for TSUBAKI-KAN (private toilet)
pub const TSUBAKI_TOILET: &str = "00002";
/// Yadosys room id for MOMIJI-KAN (river view)
pub const MOMIJI_RIVER: &str = "00005";
/// Yadosys room id for MOMIJI-KAN VIP ROOM
pub const MOMIJI_VIP: &str = "00006";
/// Yadosys room id for MOMIJI-KAN Western twin bed
pub const MOMIJI_TWIN: &str = "00007";
/// Yadosys room id for TSUBAKI-KAN (Room with a view)
pub const TSUBAKI_VIEW: &str = "00008";

/// Full Miyakowasure room catalog, in display order
pub fn catalog() -> Vec<RoomInfo> {
    vec![
        RoomInfo::new(TSUBAKI_VIEW, "TSUBAKI-KAN (Room with a view)", 3, false)
            .with_base_price(29000),
        RoomInfo::new(MOMIJI_VIP, "MOMIJI-KAN VIP ROOM", 4, false).with_base_price(30000),
        RoomInfo::new(MOMIJI_TWIN, "MOMIJI-KAN Western twin bed", 2, false).with_base_price(27000),
        RoomInfo::new(MOMIJI_RIVER, "MOMIJI-KAN (river view)", 2, false).with_base_price(27000),
        RoomInfo::new(SAKURA_RIVER, "SAKURA-KAN (river view)", 3, false).with_base_price(25000),
        RoomInfo::new(TSUBAKI_TOILET, "TSUBAKI-KAN (private toilet)", 2, false)
            .with_base_price(19500),
    ]
}

/// Resolve a user-friendly room alias to catalog room ids
///
/// Returns an empty vec for unknown aliases; callers decide whether that is
/// an error.
pub fn resolve_alias(alias: &str) -> Vec<&'static str> {
    match alias.trim().to_lowercase().as_str() {
        "tsubaki-view" | "tsubaki_view" => vec![TSUBAKI_VIEW],
        "momiji-vip" | "momiji_vip" | "vip" => vec![MOMIJI_VIP],
        "momiji-twin" | "momiji_twin" | "twin" => vec![MOMIJI_TWIN],
        "momiji-river" | "momiji_river" | "momiji" => vec![MOMIJI_RIVER],
        "sakura-river" | "sakura_river" | "sakura" => vec![SAKURA_RIVER],
        "tsubaki-toilet" | "tsubaki_toilet" | "tsubaki" => vec![TSUBAKI_TOILET],
        _ => Vec::new(),
    }
}
