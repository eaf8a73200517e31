use serde::{Deserialize, Serialize};

const HAMZA: char = '\u{0621}';
const ALEF: char = '\u{0627}';
const YAA: char = '\u{064A}';
const HAA: char = '\u{0647}';
const TAA: char = '\u{062A}';
const ALEF_MAKSOORA: char = '\u{0649}';
const TAA_MARBOOTA: char = '\u{0629}';
const TATWEEL: char = '\u{0640}';

/// Switches of the preferred canonicalization.
///
/// The defaults are the settings used for comparing recitation transcripts:
/// spaces are kept, letter variants that speech recognizers confuse are
/// folded, and every vowel or recitation mark is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PreferredSettings {
    /// Drop all whitespace instead of collapsing it
    pub remove_spaces: bool,
    /// Fold hamza carriers (أ إ ؤ ئ and combining hamza) into bare hamza ء
    pub ignore_hamzat: bool,
    /// Fold alef maksoora ى into yaa ي
    pub ignore_alef_maksoora: bool,
    /// Fold taa marboota ة into haa ه
    pub ignore_taa_marboota: bool,
    /// Rewrite taa marboota ة into taa ت (applied before `ignore_taa_marboota`)
    pub normalize_taat: bool,
    /// Strip superscript and subscript alef
    pub remove_small_alef: bool,
    /// Strip harakat, Quranic annotation marks and tatweel
    pub remove_tashkeel: bool,
}

impl Default for PreferredSettings {
    fn default() -> Self {
        Self {
            remove_spaces: false,
            ignore_hamzat: true,
            ignore_alef_maksoora: true,
            ignore_taa_marboota: true,
            normalize_taat: false,
            remove_small_alef: true,
            remove_tashkeel: true,
        }
    }
}

#[inline]
fn is_tashkeel(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{06D6}'..='\u{06ED}') || c == TATWEEL
}

#[inline]
fn is_small_alef(c: char) -> bool {
    matches!(c, '\u{0670}' | '\u{0656}')
}

/// Map one character under `settings`; `None` drops it.
fn fold_char(c: char, settings: &PreferredSettings) -> Option<char> {
    if settings.ignore_hamzat {
        match c {
            '\u{0623}' | '\u{0625}' | '\u{0624}' | '\u{0626}' | '\u{0654}' | '\u{0655}' => {
                return Some(HAMZA)
            }
            '\u{0622}' | '\u{0671}' => return Some(ALEF),
            _ => {}
        }
    }

    if settings.remove_small_alef && is_small_alef(c) {
        return None;
    }
    if settings.remove_tashkeel && is_tashkeel(c) {
        return None;
    }

    match c {
        ALEF_MAKSOORA if settings.ignore_alef_maksoora => Some(YAA),
        TAA_MARBOOTA if settings.normalize_taat => Some(TAA),
        TAA_MARBOOTA if settings.ignore_taa_marboota => Some(HAA),
        _ => Some(c),
    }
}

#[cfg(feature = "preferred-normalizer")]
pub(crate) fn normalize(text: &str, settings: &PreferredSettings) -> String {
    use unicode_normalization::UnicodeNormalization;

    // NFKC first: presentation forms and ligatures (e.g. U+FDF2) become
    // plain letters, and letter + combining hamza compose into one char.
    let folded: String = text
        .nfkc()
        .filter_map(|c| fold_char(c, settings))
        .collect();

    if settings.remove_spaces {
        folded.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(not(feature = "preferred-normalizer"))]
pub(crate) fn normalize(text: &str, _settings: &PreferredSettings) -> String {
    super::fallback::normalize(text)
}

#[cfg(all(test, feature = "preferred-normalizer"))]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        normalize(text, &PreferredSettings::default())
    }

    #[test]
    fn test_strips_tashkeel_and_small_alef() {
        assert_eq!(
            norm("بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ"),
            "بسم الله الرحمن الرحيم"
        );
    }

    #[test]
    fn test_folds_hamza_carriers() {
        assert_eq!(norm("أَحَدٌ"), "ءحد");
        assert_eq!(norm("إِيَّاكَ"), "ءياك");
        assert_eq!(norm("شَانِئَكَ"), "شانءك");
        assert_eq!(norm("ٱلْحَمْدُ"), "الحمد");
    }

    #[test]
    fn test_composes_combining_hamza() {
        // alef + combining hamza above composes to أ, which then folds
        assert_eq!(norm("\u{0627}\u{0654}حد"), "ءحد");
    }

    #[test]
    fn test_folds_maksoora_and_marboota() {
        assert_eq!(norm("عَلَىٰ الْجِنَّةِ"), "علي الجنه");
    }

    #[test]
    fn test_normalize_taat_takes_precedence() {
        let settings = PreferredSettings {
            normalize_taat: true,
            ..PreferredSettings::default()
        };
        assert_eq!(normalize("الْجِنَّةِ", &settings), "الجنت");
    }

    #[test]
    fn test_presentation_forms() {
        assert_eq!(norm("\u{FDF2}"), "الله");
    }

    #[test]
    fn test_remove_spaces() {
        let settings = PreferredSettings {
            remove_spaces: true,
            ..PreferredSettings::default()
        };
        assert_eq!(normalize("قل  هو الله", &settings), "قلهوالله");
    }

    #[test]
    fn test_keeps_disabled_folds() {
        let settings = PreferredSettings {
            ignore_hamzat: false,
            ignore_alef_maksoora: false,
            ignore_taa_marboota: false,
            ..PreferredSettings::default()
        };
        assert_eq!(normalize("أَحَدٌ عَلَىٰ الْجِنَّةِ", &settings), "أحد على الجنة");
    }
}
