//! Table-driven normalizer used when the preferred canonicalization is not
//! compiled in.

const ALEF: char = '\u{0627}';
const TATWEEL: char = '\u{0640}';

/// Alef variants folded to bare alef (ٱ أ إ آ)
const ALEF_VARIANTS: &[char] = &['\u{0671}', '\u{0623}', '\u{0625}', '\u{0622}'];

/// Quranic annotation marks: sajdah, end-of-ayah, rub el hizb and the small
/// high pause/recitation signs.
const QURANIC_MARKS: &[char] = &[
    '\u{06D7}', '\u{06DA}', '\u{06DB}', '\u{06DC}', '\u{06DD}', '\u{06DE}', '\u{06DF}',
    '\u{06E0}', '\u{06E2}', '\u{06E3}', '\u{06E4}', '\u{06E7}', '\u{06E8}', '\u{06E9}',
    '\u{06EA}', '\u{06EB}', '\u{06EC}', '\u{06ED}', '\u{06EE}', '\u{06EF}',
];

/// Harakat and other combining marks (U+064B..U+065F, U+0670, U+06D6..U+06ED)
#[inline]
fn is_harakah(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}')
}

pub(crate) fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|&c| !is_harakah(c) && c != TATWEEL && !QURANIC_MARKS.contains(&c))
        .map(|c| if ALEF_VARIANTS.contains(&c) { ALEF } else { c })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
