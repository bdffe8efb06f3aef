//! Display names for the wine cultivar classes.

/// Known cultivar ids and their display labels.
pub const CULTIVAR_LABELS: &[(u32, &str)] = &[
    (1, "Cultivar 1 (e.g. Barolo)"),
    (2, "Cultivar 2 (e.g. Grignolino)"),
    (3, "Cultivar 3 (e.g. Barbera)"),
];

/// Label for a class id, falling back to `Cultivar {id}` for unknown ids.
pub fn class_label(class_id: u32) -> String {
    CULTIVAR_LABELS
        .iter()
        .find(|(id, _)| *id == class_id)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| format!("Cultivar {class_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_use_fixed_labels() {
        assert_eq!(class_label(2), "Cultivar 2 (e.g. Grignolino)");
    }

    #[test]
    fn unknown_ids_fall_back() {
        assert_eq!(class_label(7), "Cultivar 7");
    }
}
