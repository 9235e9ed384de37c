use crate::layout::{
    LABEL_ENGLISH, LABEL_FORMS, LABEL_GREEK, LABEL_TRANSLATION, MAX_STYLED_ROW, PLACEHOLDER,
};
use crate::lesson::{Form, Lesson, Meaning, Reading, ReadingVocab, SentencePair, VocabEntry};
use anyhow::Result;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use umya_spreadsheet::Worksheet;

const COL_B: u32 = 2;
const COL_C: u32 = 3;
const COL_D: u32 = 4;
const COL_E: u32 = 5;
const COL_F: u32 = 6;

/// A layout violation in the sheet being decoded.
///
/// These are fatal: a mismatch means the sheet was hand-edited out of
/// shape, and guessing an alignment would corrupt the lesson data.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The four parallel newline-joined columns of a FORMS or MEANINGS row
    /// have different lengths.
    #[error("row {row}: parallel {section} columns differ in length {lengths:?}")]
    ParallelListMismatch {
        row: u32,
        section: &'static str,
        lengths: [usize; 4],
    },
    /// A label cell holds text outside the closed set valid at that point.
    #[error("row {row}: unexpected section label {found:?}")]
    UnexpectedSectionLabel { row: u32, found: String },
    /// Cell B1 is blank and the source name contains no digits to fall
    /// back on.
    #[error("no lesson id: cell B1 is blank and {source:?} contains no digits")]
    MissingId { source: String },
    /// The id cell (or its filename fallback) is not a number.
    #[error("lesson id {value:?} is not a number")]
    BadId { value: String },
    /// Ran past the styled band without finding the TRANSLATION row.
    #[error("no TRANSLATION row found by row {row}")]
    TranslationNotFound { row: u32 },
}

/// Mutable row cursor, 1-indexed. Starts before the first row; sentinel
/// loops advance it, peek at column B, and back up one row when they read
/// past their section.
struct RowCursor {
    row: u32,
}

impl RowCursor {
    fn new() -> Self {
        RowCursor { row: 0 }
    }

    fn next_row(&mut self) {
        self.row += 1;
    }

    fn previous_row(&mut self) {
        self.row -= 1;
    }
}

/// Parses the fixed lesson sheet layout back into a [`Lesson`].
///
/// `source_hint` is the path or name of the workbook being decoded; it is
/// only consulted when cell B1 is blank, to derive the lesson id from the
/// first run of digits in the name.
pub struct LessonSheetParser {
    source_hint: String,
}

impl LessonSheetParser {
    pub fn new(source_hint: impl Into<String>) -> Self {
        LessonSheetParser {
            source_hint: source_hint.into(),
        }
    }

    pub fn parse(&self, sheet: &Worksheet) -> Result<Lesson> {
        let mut cursor = RowCursor::new();

        cursor.next_row();
        let id = self.parse_id(&value(sheet, COL_B, cursor.row))?;

        cursor.next_row();
        let title = value(sheet, COL_B, cursor.row);

        let mut vocab = Vec::new();
        loop {
            cursor.next_row();
            if label(sheet, cursor.row) != LABEL_FORMS {
                cursor.previous_row();
                break;
            }
            vocab.push(parse_vocab_entry(sheet, &mut cursor)?);
        }

        let mut sentences = Vec::new();
        loop {
            cursor.next_row();
            let row_label = label(sheet, cursor.row);
            if row_label != LABEL_GREEK && row_label != LABEL_ENGLISH {
                cursor.previous_row();
                break;
            }
            sentences.push(parse_sentence_pair(sheet, &mut cursor, &row_label)?);
        }

        let reading = parse_reading(sheet, &mut cursor)?;

        debug!(
            id,
            vocab = vocab.len(),
            sentences = sentences.len(),
            has_reading = reading.is_some(),
            "decoded lesson sheet"
        );

        Ok(Lesson {
            id: Some(id),
            title,
            vocab,
            sentences,
            reading,
        })
    }

    fn parse_id(&self, b1: &str) -> Result<u32> {
        let text = if b1.is_empty() {
            let digits = Regex::new(r"\d+")?;
            match digits.find(&self.source_hint) {
                Some(m) => m.as_str().to_string(),
                None => {
                    return Err(LayoutError::MissingId {
                        source: self.source_hint.clone(),
                    }
                    .into())
                }
            }
        } else {
            b1.to_string()
        };
        text.parse::<u32>()
            .map_err(|_| LayoutError::BadId { value: text }.into())
    }
}

/// Reads a cell as display text, trimmed. A missing cell reads as empty.
fn value(sheet: &Worksheet, col: u32, row: u32) -> String {
    sheet.get_value((col, row)).trim().to_string()
}

/// Reads a column-B sentinel cell verbatim for label matching.
fn label(sheet: &Worksheet, row: u32) -> String {
    sheet.get_value((COL_B, row))
}

/// Splits an already-trimmed cell into its non-empty lines. Interior lines
/// keep their own whitespace; only fully empty lines are dropped.
fn split_lines(cell: &str) -> Vec<String> {
    cell.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Maps a comma-joined affix line back to a list; `-` or blank means the
/// field was absent.
fn split_affixes(line: &str) -> Option<Vec<String>> {
    if line.trim().is_empty() || line == PLACEHOLDER {
        None
    } else {
        Some(line.split(',').map(|s| s.to_string()).collect())
    }
}

/// Cursor sits on the FORMS row; consumes the FORMS/MEANINGS/EXPLANATION
/// triple of one vocabulary entry.
fn parse_vocab_entry(sheet: &Worksheet, cursor: &mut RowCursor) -> Result<VocabEntry> {
    let stem_list = split_lines(&value(sheet, COL_C, cursor.row));
    let prefixes_list = split_lines(&value(sheet, COL_D, cursor.row));
    let suffices_list = split_lines(&value(sheet, COL_E, cursor.row));
    let articles_list = split_lines(&value(sheet, COL_F, cursor.row));
    let lengths = [
        stem_list.len(),
        prefixes_list.len(),
        suffices_list.len(),
        articles_list.len(),
    ];
    if lengths.iter().any(|&len| len != lengths[0]) {
        return Err(LayoutError::ParallelListMismatch {
            row: cursor.row,
            section: "forms",
            lengths,
        }
        .into());
    }

    let mut forms = Vec::new();
    for (((stem, prefixes), suffices), articles) in stem_list
        .iter()
        .zip(&prefixes_list)
        .zip(&suffices_list)
        .zip(&articles_list)
    {
        // A blank stem line marks a deleted form; the whole row entry is
        // skipped.
        if stem.trim().is_empty() {
            continue;
        }
        forms.push(Form {
            stem: (stem != PLACEHOLDER).then(|| stem.clone()),
            prefixes: split_affixes(prefixes),
            suffices: split_affixes(suffices),
            articles: split_affixes(articles),
        });
    }

    cursor.next_row();

    let pos_list = split_lines(&value(sheet, COL_C, cursor.row));
    let meanings_list = split_lines(&value(sheet, COL_D, cursor.row));
    let labels_list = split_lines(&value(sheet, COL_E, cursor.row));
    let usage_list = split_lines(&value(sheet, COL_F, cursor.row));
    let lengths = [
        pos_list.len(),
        meanings_list.len(),
        labels_list.len(),
        usage_list.len(),
    ];
    if lengths.iter().any(|&len| len != lengths[0]) {
        return Err(LayoutError::ParallelListMismatch {
            row: cursor.row,
            section: "meanings",
            lengths,
        }
        .into());
    }

    let mut meanings = Vec::new();
    for (((pos, meaning), labels), usage) in pos_list
        .iter()
        .zip(&meanings_list)
        .zip(&labels_list)
        .zip(&usage_list)
    {
        meanings.push(Meaning {
            pos: (pos.trim() != PLACEHOLDER).then(|| pos.clone()),
            meanings: meaning.clone(),
            labels: (labels.trim() != PLACEHOLDER)
                .then(|| labels.split(',').map(|s| s.to_string()).collect()),
            usage: (usage.trim() != PLACEHOLDER)
                .then(|| usage.split(',').map(|s| s.to_string()).collect()),
        });
    }

    cursor.next_row();

    // Explanation text keeps its own whitespace; only an all-blank cell
    // means absent.
    let explanation = sheet.get_value((COL_C, cursor.row));
    let explanation = (!explanation.trim().is_empty()).then_some(explanation);

    Ok(VocabEntry {
        forms,
        meanings,
        explanation,
    })
}

/// Cursor sits on the first row of a pair labeled GREEK or ENGLISH;
/// consumes both rows. Both members are always present in the result,
/// defaulting to empty text.
fn parse_sentence_pair(
    sheet: &Worksheet,
    cursor: &mut RowCursor,
    row_label: &str,
) -> Result<SentencePair> {
    let mut pair = SentencePair::default();
    match row_label {
        LABEL_GREEK => {
            pair.greek = Some(value(sheet, COL_C, cursor.row));
            cursor.next_row();
            pair.english_ = Some(value(sheet, COL_C, cursor.row));
        }
        LABEL_ENGLISH => {
            pair.english = Some(value(sheet, COL_C, cursor.row));
            cursor.next_row();
            pair.greek_ = Some(value(sheet, COL_C, cursor.row));
        }
        other => {
            return Err(LayoutError::UnexpectedSectionLabel {
                row: cursor.row,
                found: other.to_string(),
            }
            .into())
        }
    }
    Ok(pair)
}

/// Consumes the whole reading block. A blank title means the lesson has no
/// reading; the block is still consumed but dropped from the result.
fn parse_reading(sheet: &Worksheet, cursor: &mut RowCursor) -> Result<Option<Reading>> {
    cursor.next_row();
    let title = value(sheet, COL_C, cursor.row);

    cursor.next_row();
    let text = value(sheet, COL_C, cursor.row);

    let mut vocab = Vec::new();
    loop {
        cursor.next_row();
        if label(sheet, cursor.row) == LABEL_TRANSLATION {
            cursor.previous_row();
            break;
        }
        if cursor.row > MAX_STYLED_ROW {
            return Err(LayoutError::TranslationNotFound { row: cursor.row }.into());
        }
        vocab.push(ReadingVocab {
            word: value(sheet, COL_C, cursor.row),
            explanation: value(sheet, COL_D, cursor.row),
        });
    }

    cursor.next_row();
    let translation = value(sheet, COL_C, cursor.row);

    if title.is_empty() {
        return Ok(None);
    }
    Ok(Some(Reading {
        title,
        text,
        vocab,
        translation,
    }))
}
