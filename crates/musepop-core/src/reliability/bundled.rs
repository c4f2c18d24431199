//! Data shipped with the binary for runs without network access.

use crate::models::{Provenance, RankedEntityRecord, ResolvedQuantity};

/// Year of the bundled ranking figures.
pub const SNAPSHOT_YEAR: i32 = 2024;

// (museum, city label, country, visitors, city key)
const SNAPSHOT: &[(&str, &str, &str, u64, &str)] = &[
    ("Louvre", "Paris", "France", 8_900_000, "Paris"),
    ("National Museum of China", "Beijing", "China", 7_290_000, "Beijing"),
    ("Vatican Museums", "Vatican City", "Vatican City", 6_770_000, "Vatican_City"),
    ("Natural History Museum", "London", "United Kingdom", 5_810_000, "London"),
    ("British Museum", "London", "United Kingdom", 5_820_000, "London"),
    ("Tate Modern", "London", "United Kingdom", 5_570_000, "London"),
    ("The Metropolitan Museum of Art", "New York City", "United States", 5_360_000, "New_York_City"),
    ("National Gallery", "London", "United Kingdom", 5_250_000, "London"),
    ("Shanghai Science and Technology Museum", "Shanghai", "China", 4_820_000, "Shanghai"),
    ("National Gallery of Art", "Washington, D.C.", "United States", 4_210_000, "Washington,_D.C."),
    ("National Museum of Natural History", "Washington, D.C.", "United States", 4_200_000, "Washington,_D.C."),
    ("Nanjing Museum", "Nanjing", "China", 4_170_000, "Nanjing"),
    ("Victoria and Albert Museum", "London", "United Kingdom", 4_000_000, "London"),
    ("Reina Sofía", "Madrid", "Spain", 3_900_000, "Madrid"),
    ("China Science Technology Museum", "Beijing", "China", 3_880_000, "Beijing"),
    ("National Palace Museum", "Taipei", "Taiwan", 3_830_000, "Taipei"),
    ("Zhejiang Museum", "Hangzhou", "China", 3_600_000, "Hangzhou"),
    ("State Hermitage Museum", "Saint Petersburg", "Russia", 3_570_000, "Saint_Petersburg"),
    ("National Museum of Korea", "Seoul", "South Korea", 3_350_000, "Seoul"),
    ("Science Museum", "London", "United Kingdom", 3_300_000, "London"),
    ("Musée d'Orsay", "Paris", "France", 3_270_000, "Paris"),
    ("National Gallery of Victoria", "Melbourne", "Australia", 3_200_000, "Melbourne"),
    ("Museo del Prado", "Madrid", "Spain", 3_200_000, "Madrid"),
    ("Somerset House", "London", "United Kingdom", 3_200_000, "London"),
    ("National Air and Space Museum", "Washington, D.C.", "United States", 3_200_000, "Washington,_D.C."),
    ("American Museum of Natural History", "New York City", "United States", 3_100_000, "New_York_City"),
    ("Centre Pompidou", "Paris", "France", 3_010_000, "Paris"),
    ("National Museum of American History", "Washington, D.C.", "United States", 2_800_000, "Washington,_D.C."),
    ("Rijksmuseum", "Amsterdam", "Netherlands", 2_700_000, "Amsterdam"),
    ("Tokyo National Museum", "Tokyo", "Japan", 2_300_000, "Tokyo"),
    ("Van Gogh Museum", "Amsterdam", "Netherlands", 2_160_000, "Amsterdam"),
    ("Acropolis Museum", "Athens", "Greece", 2_100_000, "Athens"),
    ("Uffizi Galleries", "Florence", "Italy", 2_100_000, "Florence"),
];

const CURATED_POPULATION: &[(&str, u64)] = &[
    ("Paris", 2_161_000),
    ("Beijing", 21_540_000),
    ("Vatican_City", 825),
    ("London", 8_982_000),
    ("New_York_City", 8_336_000),
    ("Washington,_D.C.", 689_000),
    ("Saint_Petersburg", 5_384_000),
    ("Shanghai", 24_870_000),
    ("Taipei", 2_646_000),
    ("Madrid", 3_223_000),
    ("Seoul", 9_776_000),
    ("Hangzhou", 12_200_000),
    ("Amsterdam", 905_000),
    ("Nanjing", 9_430_000),
    ("Melbourne", 5_078_000),
    ("Athens", 3_154_000),
    ("Florence", 382_000),
    ("Tokyo", 13_960_000),
    ("Moscow", 12_630_000),
];

/// The bundled ranking, attributed to `provenance_url`.
pub fn bundled_snapshot(provenance_url: &str) -> Vec<RankedEntityRecord> {
    SNAPSHOT
        .iter()
        .map(|&(name, city, country, visitors, key)| RankedEntityRecord {
            name: name.to_string(),
            group_label: city.to_string(),
            group_key: Some(key.to_string()),
            category_label: Some(country.to_string()),
            magnitude: Some(visitors),
            period: Some(SNAPSHOT_YEAR),
            provenance_url: provenance_url.to_string(),
        })
        .collect()
}

/// Curated population for a group key, with no entity id and no date.
pub fn curated_population(key: &str) -> Option<ResolvedQuantity> {
    CURATED_POPULATION
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(k, population)| ResolvedQuantity {
            label: k.replace('_', " "),
            entity_id: String::new(),
            quantity: population,
            as_of: None,
            source_key: k.to_string(),
            provenance: Provenance::Bundled,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_VISITOR_THRESHOLD;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundled_museums_meet_threshold() {
        let snapshot = bundled_snapshot("u");
        assert_eq!(snapshot.len(), SNAPSHOT.len());
        assert!(snapshot
            .iter()
            .all(|r| r.meets_threshold(DEFAULT_VISITOR_THRESHOLD)));
    }

    #[test]
    fn test_bundled_keys_have_curated_population() {
        for record in bundled_snapshot("u") {
            let key = record.join_key().unwrap();
            assert!(curated_population(&key).is_some(), "no population for {key}");
        }
    }

    #[test]
    fn test_curated_population_shape() {
        let dc = curated_population("Washington,_D.C.").unwrap();
        assert_eq!(dc.label, "Washington, D.C.");
        assert_eq!(dc.entity_id, "");
        assert_eq!(dc.quantity, 689_000);
        assert_eq!(dc.provenance, Provenance::Bundled);
        assert_eq!(curated_population("Atlantis"), None);
    }
}
