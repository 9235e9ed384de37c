//! The layout contract shared by both conversion directions.
//!
//! Everything here is part of the fixed sheet format: the sentinel labels
//! the decoder keys on, the fills and font of the rendered sheet, and the
//! placeholder counts used when a lesson is missing whole sections. Both
//! `generator` and `parser` import from this module so the two directions
//! cannot drift apart.

/// Section and row labels, written to column A or B and matched verbatim
/// by the decoder.
pub const LABEL_ID: &str = "ID";
pub const LABEL_TITLE: &str = "TITLE";
pub const LABEL_FORMS: &str = "FORMS";
pub const LABEL_MEANINGS: &str = "MEANINGS";
pub const LABEL_EXPLANATION: &str = "EXPLANATION";
pub const LABEL_VOCABULARY: &str = "VOCABULARY";
pub const LABEL_GREEK: &str = "GREEK";
pub const LABEL_ENGLISH_ALT: &str = "ENGLISH_";
pub const LABEL_ENGLISH: &str = "ENGLISH";
pub const LABEL_GREEK_ALT: &str = "GREEK_";
pub const LABEL_SENTENCES: &str = "SENTENCES";
pub const LABEL_TEXT: &str = "TEXT";
pub const LABEL_TRANSLATION: &str = "TRANSLATION";
pub const LABEL_READING: &str = "READING";

/// Field legends stamped into C1:F1. Each names the content of its column
/// for the FORMS, MEANINGS and EXPLANATION rows respectively.
pub const FIELD_LEGENDS: [&str; 4] = [
    "STM/POS/WRD",
    "PRS/MNS/EXP",
    "SFS/LBS/EXP",
    "ARS/USG/EXP",
];

/// Placeholder written for a missing scalar or list cell line.
pub const PLACEHOLDER: &str = "-";

/// Entries rendered when the lesson has no `vocab` list.
pub const DEFAULT_VOCAB_COUNT: usize = 10;
/// Slots rendered when the lesson has no `sentences` list.
pub const DEFAULT_SENTENCE_COUNT: usize = 15;
/// Rows rendered when the reading has no `vocab` list.
pub const DEFAULT_READING_VOCAB_COUNT: usize = 10;
/// Elements assumed for a vocab entry with no `forms` or `meanings` list.
pub const DEFAULT_FORMS_COUNT: usize = 1;

/// Sentence slots up to this index are stored Greek-first, the rest
/// English-first.
pub const GREEK_FIRST_SLOTS: usize = 10;

pub const FONT_NAME: &str = "Calibri";
pub const COLUMN_WIDTH: f64 = 15.0;
/// Rows 1..=MAX_STYLED_ROW of columns A-F carry the base style (font,
/// vertical centering, text number format) even when empty.
pub const MAX_STYLED_ROW: u32 = 199;
/// Number of content columns (A-F).
pub const GRID_COLS: u16 = 6;

pub const LIGHT_BLUE_FILL: u32 = 0xDDEBF7;
pub const LIGHT_ORANGE_FILL: u32 = 0xFDE9D9;
pub const DARK_ORANGE_FILL: u32 = 0xFCD5B4;

/// Alternating fills for the per-entry label cells; toggled once per vocab
/// entry and once per sentence pair.
pub const ORANGE_FILLS: [u32; 2] = [LIGHT_ORANGE_FILL, DARK_ORANGE_FILL];

/// Reference glyphs (long vowels with accents) stamped into H1:M1. Fixed
/// annotation for sheet editors, unrelated to lesson content.
pub const LONG_VOWEL_GLYPHS: [&str; 6] = ["ᾱ́", "ᾱ̀", "ῑ́", "ῑ̀", "ῡ́", "ῡ̀"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_distinct() {
        let labels = [
            LABEL_ID,
            LABEL_TITLE,
            LABEL_FORMS,
            LABEL_MEANINGS,
            LABEL_EXPLANATION,
            LABEL_VOCABULARY,
            LABEL_GREEK,
            LABEL_ENGLISH_ALT,
            LABEL_ENGLISH,
            LABEL_GREEK_ALT,
            LABEL_SENTENCES,
            LABEL_TEXT,
            LABEL_TRANSLATION,
            LABEL_READING,
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_glyph_count_matches_annotation_columns() {
        // H through M
        assert_eq!(LONG_VOWEL_GLYPHS.len(), 6);
    }
}
