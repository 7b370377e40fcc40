/// A named island reference point inside an archipelago province
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub label: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn anchor(label: &'static str, lat: f64, lng: f64) -> Anchor {
    Anchor { label, lat, lng }
}

const BALEARES: &[Anchor] = &[
    anchor("Mallorca", 39.62, 2.95),
    anchor("Menorca", 39.95, 4.10),
    anchor("Ibiza", 38.98, 1.43),
    anchor("Formentera", 38.70, 1.45),
];

const LAS_PALMAS: &[Anchor] = &[
    anchor("Gran Canaria", 27.95, -15.60),
    anchor("Lanzarote", 29.05, -13.63),
    anchor("Fuerteventura", 28.40, -14.00),
];

const SANTA_CRUZ_DE_TENERIFE: &[Anchor] = &[
    anchor("Tenerife", 28.29, -16.62),
    anchor("La Palma", 28.68, -17.85),
    anchor("La Gomera", 28.10, -17.22),
    anchor("El Hierro", 27.75, -18.00),
];

/// Province name (with the spellings found in public datasets) to island anchors
const ARCHIPELAGOS: &[(&str, &[Anchor])] = &[
    ("Illes Balears", BALEARES),
    ("Baleares", BALEARES),
    ("Islas Baleares", BALEARES),
    ("Las Palmas", LAS_PALMAS),
    ("Santa Cruz de Tenerife", SANTA_CRUZ_DE_TENERIFE),
];

/// Island anchors for an archipelago province, `None` for every other name
pub fn anchors_for(province: &str) -> Option<&'static [Anchor]> {
    ARCHIPELAGOS
        .iter()
        .find(|(name, _)| *name == province)
        .map(|(_, anchors)| *anchors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balearic_aliases_share_anchors() {
        let a = anchors_for("Illes Balears").unwrap();
        let b = anchors_for("Baleares").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_mainland_has_no_anchors() {
        assert!(anchors_for("Madrid").is_none());
        assert!(anchors_for("").is_none());
    }
}
