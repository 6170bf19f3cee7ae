//! Abbreviated key alphabet.
//!
//! Skill documents repeat the same handful of field names, so TOON lets each
//! of them be written as a single uppercase letter. [`KEY_ALIASES`] is the one
//! source of truth; both lookup directions are derived from it.

/// `(full name, abbreviation)` pairs. Each full name and each letter appears
/// at most once.
pub const KEY_ALIASES: &[(&str, char)] = &[
    ("name", 'N'),
    ("category", 'C'),
    ("description", 'D'),
    ("allowed_tools", 'T'),
    ("path", 'P'),
    ("tags", 'G'),
    ("platforms", 'F'),
    ("commands", 'X'),
    ("rules", 'R'),
    ("steps", 'S'),
    ("use_cases", 'U'),
    ("examples", 'E'),
    ("methods", 'M'),
];

/// Full name → abbreviation, e.g. `"description"` → `'D'`.
pub fn abbreviate(full: &str) -> Option<char> {
    KEY_ALIASES
        .iter()
        .find(|(name, _)| *name == full)
        .map(|(_, letter)| *letter)
}

/// Abbreviated key → full name. Only single uppercase letters are candidates;
/// anything else (including unknown letters) yields `None`.
pub fn expand(key: &str) -> Option<&'static str> {
    let mut chars = key.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    KEY_ALIASES
        .iter()
        .find(|(_, l)| *l == letter)
        .map(|(name, _)| *name)
}

/// Normalize a decoded key: abbreviations expand, everything else passes through.
pub fn canonical(key: &str) -> String {
    expand(key).map(str::to_string).unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_no_duplicate_names_or_letters() {
        let names: HashSet<_> = KEY_ALIASES.iter().map(|(n, _)| n).collect();
        let letters: HashSet<_> = KEY_ALIASES.iter().map(|(_, l)| l).collect();
        assert_eq!(names.len(), KEY_ALIASES.len());
        assert_eq!(letters.len(), KEY_ALIASES.len());
    }

    #[test]
    fn both_directions_agree() {
        for (name, letter) in KEY_ALIASES {
            assert_eq!(abbreviate(name), Some(*letter));
            assert_eq!(expand(&letter.to_string()), Some(*name));
        }
    }

    #[test]
    fn only_single_uppercase_letters_expand() {
        assert_eq!(expand("n"), None);
        assert_eq!(expand("ND"), None);
        assert_eq!(expand("Z"), None);
        assert_eq!(expand(""), None);
        assert_eq!(canonical("Z"), "Z");
        assert_eq!(canonical("D"), "description");
        assert_eq!(canonical("title"), "title");
    }
}
