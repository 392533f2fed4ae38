// 🪪 Athlete Identity - alias table + canonical keys
//
// The same skater shows up as "Joe Mazzone" one year and "Joseph Mazzone" the
// next. Career stats only join if both spellings map to one key.
//
// canonical key = lowercase(trim(name)), then replaced by the lowercased
// canonical display name when the trimmed form is a known alias.

use crate::error::{StatsError, StatsResult};

// ============================================================================
// ALIAS TABLE
// ============================================================================

/// Known name variants (lowercase, trimmed) → canonical display name
pub const ATHLETE_ALIASES: &[(&str, &str)] = &[
    // Nickname / short name variants
    ("joe mazzone", "Joseph Mazzone"),
    ("tony mao", "Anthony Mao"),
    ("ben bailey", "Benjamin Bailey"),
    ("chris slaughter", "Christopher Slaughter"),
    ("jeff crowe", "Jeffrey Crowe"),
    ("jeff vyain", "Jeffrey Vyain"),
    ("joe burnham", "Joseph Burnham"),
    ("matt ayres", "Matthew Ayres"),
    ("nick carbot", "Nicholas Carbot"),
    ("ray st john", "Raymond St John"),
    ("sam robinson", "Samuel Robinson"),
    ("cami best", "Camille Best"),
    ("will bruce", "William Bruce"),
    ("will frank", "William Frank"),
    ("monzu haque", "Monzurul Haque"),
    ("zac johnson", "Zachary Johnson"),
    ("ron lewis", "Ronald Lewis"),
    ("jen shyu", "Jennifer Shyu"),
    ("randall mcclelland", "Randy McClelland"),
    ("james sands", "Jamie Sands"),
    ("bill ennis", "William Ennis"),
    ("bill polewchak", "William Polewchak"),
    ("tori kennedy", "Victoria Kennedy"),
    ("alexandra loch-mally", "Lexi Loch-Mally"),
    ("kenneth spranzo", "Kenny Spranzo"),
    ("alfredo valdes", "Freddie Valdes"),
    // Parenthetical / middle name variants
    ("ll (leonard) leffler", "Leonard Leffler"),
    ("leonard l leffler", "Leonard Leffler"),
    ("bob (robert) foster", "Bob Foster"),
    ("blake ( califlorida ) parsons", "Blake Parsons"),
    ("adrienne smith (pole skate)", "Adrienne Smith"),
    // Middle initials
    ("adrian f rodriguez", "Adrian Rodriguez"),
    ("adrian f. rodriguez", "Adrian Rodriguez"),
    ("francisco l. rodriguez", "Francisco Rodriguez"),
    ("julian f. rodriguez", "Julian Rodriguez"),
    ("melanie l. castro", "Melanie Castro"),
    // Data entry errors
    ("damen 2 sistrunk", "Damen Sistrunk"),
    ("damen2 sistrunk", "Damen Sistrunk"),
    // Typos
    ("hopemare jackson", "Hopemarie Jackson"),
    ("fransico ramirez", "Francisco Ramirez"),
    ("katheryn leffler", "Kathryn Leffler"),
    // Accents
    ("joòo morales", "Joao Morales"),
    ("cesar nuñez", "Cesar Nunez"),
    ("reinell gonzález", "Reinell Gonzalez"),
    // Display casing differs from first occurrence
    ("john odonnell", "John O'Donnell"),
    ("daniel dimassa", "Daniel DiMassa"),
];

fn normalize(raw_name: &str) -> String {
    raw_name.trim().to_lowercase()
}

/// Canonical display name for a known variant, e.g. "Joe Mazzone" → "Joseph Mazzone"
pub fn canonical_display_name(raw_name: &str) -> Option<&'static str> {
    let normalized = normalize(raw_name);
    ATHLETE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| *canonical)
}

/// Compute the identity key for an athlete name
pub fn canonicalize(raw_name: &str) -> StatsResult<String> {
    let normalized = normalize(raw_name);
    if normalized.is_empty() {
        return Err(StatsError::InvalidInput(
            "Athlete name cannot be empty".to_string(),
        ));
    }

    Ok(match canonical_display_name(&normalized) {
        Some(canonical) => canonical.to_lowercase(),
        None => normalized,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolves_to_canonical() {
        assert_eq!(canonicalize("Joe Mazzone").unwrap(), "joseph mazzone");
        assert_eq!(canonicalize("Joseph Mazzone").unwrap(), "joseph mazzone");
    }

    #[test]
    fn test_case_and_whitespace_normalized() {
        assert_eq!(canonicalize("  JOE mazzone ").unwrap(), "joseph mazzone");
        assert_eq!(canonicalize("Jane Doe").unwrap(), "jane doe");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(canonicalize(""), Err(StatsError::InvalidInput(_))));
        assert!(matches!(canonicalize("   "), Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_canonical_display_name() {
        assert_eq!(canonical_display_name("Tori Kennedy"), Some("Victoria Kennedy"));
        assert_eq!(canonical_display_name("john odonnell"), Some("John O'Donnell"));
        assert_eq!(canonical_display_name("Victoria Kennedy"), None);
    }

    #[test]
    fn test_accent_and_typo_variants() {
        assert_eq!(canonicalize("Cesar Nuñez").unwrap(), "cesar nunez");
        assert_eq!(canonicalize("Cesar Nunez").unwrap(), "cesar nunez");
        assert_eq!(canonicalize("Damen2 Sistrunk").unwrap(), "damen sistrunk");
    }

    #[test]
    fn test_alias_keys_are_normalized() {
        for (alias, canonical) in ATHLETE_ALIASES {
            assert_eq!(*alias, normalize(alias), "alias key not normalized: {}", alias);
            assert!(!canonical.is_empty());
        }
    }
}
