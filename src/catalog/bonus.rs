// Pit of Misery bonus pool.
// These towers live under `images/PoM/` and are never picked up by the scan;
// this table is the only source for `pomImages`.
use super::CatalogEntry;

/// Reserved directory name for the bonus pool, relative to the image root.
pub const BONUS_DIR: &str = "PoM";

/// (acronym, full name). Image file is `PoM/<acronym>.jpg`.
pub const POM_TOWERS: &[(&str, &str)] = &[
    ("ToXIC", "Tower of Xerially Infuriating Calamity"),
    ("ToOLC", "Tower of Overthinking Life Choices"),
    ("ToVM", "Tower of Vindinctive Maneuvers"),
    ("ToSE", "Tower of Shunning Excursion"),
    ("ToVH", "Tower of Vacant Hindrances"),
    ("ToWM", "Tower of Water Melon"),
    ("TotRP", "Tower of The Roof's Pique"),
    ("ToEV", "Tower of Eternal Void"),
    ("ToBF", "Tower of Blind Fate"),
    ("ToSF", "Tower of Spiralling Fates"),
    ("ToMDC", "Tower of Modernistic Design Choices"),
    ("WaT", "Was A Tower"),
    ("CoIV", "Citadel of Infinite Void"),
];

/// Bonus entries with urls rooted at `/images`.
pub fn bonus_entries() -> Vec<CatalogEntry> {
    bonus_entries_with_prefix("/images")
}

pub fn bonus_entries_with_prefix(url_prefix: &str) -> Vec<CatalogEntry> {
    let prefix = url_prefix.trim_end_matches('/');
    POM_TOWERS
        .iter()
        .map(|(acronym, name)| {
            CatalogEntry::new(
                format!("{prefix}/{BONUS_DIR}/{acronym}.jpg"),
                vec![acronym.to_string(), name.to_string()],
            )
        })
        .collect()
}
