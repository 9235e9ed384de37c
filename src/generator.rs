use crate::layout::{
    COLUMN_WIDTH, DEFAULT_FORMS_COUNT, DEFAULT_READING_VOCAB_COUNT, DEFAULT_SENTENCE_COUNT,
    DEFAULT_VOCAB_COUNT, FIELD_LEGENDS, FONT_NAME, GREEK_FIRST_SLOTS, GRID_COLS, LABEL_ENGLISH,
    LABEL_ENGLISH_ALT, LABEL_EXPLANATION, LABEL_FORMS, LABEL_GREEK, LABEL_GREEK_ALT, LABEL_ID,
    LABEL_MEANINGS, LABEL_READING, LABEL_SENTENCES, LABEL_TEXT, LABEL_TITLE, LABEL_TRANSLATION,
    LABEL_VOCABULARY, LIGHT_BLUE_FILL, LONG_VOWEL_GLYPHS, MAX_STYLED_ROW, ORANGE_FILLS,
    PLACEHOLDER,
};
use crate::lesson::Lesson;
use anyhow::Result;
use rust_xlsxwriter::{ColNum, Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

const COL_A: ColNum = 0;
const COL_B: ColNum = 1;
const COL_C: ColNum = 2;
const COL_F: ColNum = 5;
const ANNOTATION_COL: ColNum = 7; // column H

/// Cell formats for one generation run, built once and passed into the
/// layout helpers.
///
/// rust_xlsxwriter attaches an immutable format to each cell at write
/// time, so every variant here already carries the base style (font,
/// vertical centering, text number format) plus the thin border of
/// populated rows.
pub struct SheetStyles {
    /// Base style without border, for the empty styled band below the
    /// content rows.
    base: Format,
    /// Bordered content cell.
    cell: Format,
    /// Bordered, horizontally centered content cell (id and title values).
    centered: Format,
    /// Section/label title: centered on a light blue fill.
    title: Format,
    /// Per-entry label titles on the two alternating orange fills.
    orange_titles: [Format; 2],
}

impl SheetStyles {
    pub fn new() -> Self {
        let base = Format::new()
            .set_font_name(FONT_NAME)
            .set_align(FormatAlign::VerticalCenter)
            .set_num_format("@");
        let cell = base.clone().set_border(FormatBorder::Thin);
        let centered = cell.clone().set_align(FormatAlign::Center);
        let title = centered
            .clone()
            .set_background_color(Color::RGB(LIGHT_BLUE_FILL));
        let orange_titles = [
            centered
                .clone()
                .set_background_color(Color::RGB(ORANGE_FILLS[0])),
            centered
                .clone()
                .set_background_color(Color::RGB(ORANGE_FILLS[1])),
        ];
        SheetStyles {
            base,
            cell,
            centered,
            title,
            orange_titles,
        }
    }
}

impl Default for SheetStyles {
    fn default() -> Self {
        Self::new()
    }
}

/// Row cursor over a worksheet. Rows are 1-indexed to match the sheet
/// layout; the cursor starts before the first row and is advanced before
/// each logical row is written.
struct SheetWriter<'a> {
    worksheet: &'a mut Worksheet,
    row: u32,
    orange_idx: usize,
}

impl<'a> SheetWriter<'a> {
    fn new(worksheet: &'a mut Worksheet) -> Self {
        SheetWriter {
            worksheet,
            row: 0,
            orange_idx: 0,
        }
    }

    fn next_row(&mut self) {
        self.row += 1;
    }

    fn toggle_orange(&mut self) {
        self.orange_idx = 1 - self.orange_idx;
    }

    fn set(&mut self, col: ColNum, text: &str, format: &Format) -> Result<()> {
        self.worksheet
            .write_string_with_format(self.row - 1, col, text, format)?;
        Ok(())
    }

    /// Merge columns of the current row into one cell.
    fn merge_cols(
        &mut self,
        first_col: ColNum,
        last_col: ColNum,
        text: &str,
        format: &Format,
    ) -> Result<()> {
        self.worksheet
            .merge_range(self.row - 1, first_col, self.row - 1, last_col, text, format)?;
        Ok(())
    }

    /// Merge a vertical run of one column. A single-row run degenerates to
    /// a plain write (a one-cell merge is invalid).
    fn merge_rows(
        &mut self,
        col: ColNum,
        first_row: u32,
        last_row: u32,
        text: &str,
        format: &Format,
    ) -> Result<()> {
        if first_row == last_row {
            self.worksheet
                .write_string_with_format(first_row - 1, col, text, format)?;
        } else {
            self.worksheet
                .merge_range(first_row - 1, col, last_row - 1, col, text, format)?;
        }
        Ok(())
    }
}

/// Renders a [`Lesson`] into the fixed sheet layout.
///
/// Generation never fails on missing lesson data: absent fields render as
/// empty text or `-` placeholders, and absent lists are replaced with
/// section-specific placeholder runs so the sheet always has every section
/// laid out for hand editing.
pub struct LessonSheetGenerator {
    lesson: Lesson,
}

impl LessonSheetGenerator {
    pub fn new(lesson: Lesson) -> Self {
        LessonSheetGenerator { lesson }
    }

    /// Builds a single-sheet workbook containing the rendered lesson.
    pub fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.output_to_worksheet(worksheet)?;
        Ok(workbook)
    }

    pub fn output_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        debug!(
            vocab = self.lesson.vocab.len(),
            sentences = self.lesson.sentences.len(),
            has_reading = self.lesson.reading.is_some(),
            "laying out lesson sheet"
        );

        let styles = SheetStyles::new();

        for col in 0..GRID_COLS {
            worksheet.set_column_width(col, COLUMN_WIDTH)?;
        }

        let mut w = SheetWriter::new(worksheet);

        // Row 1: id and the field legends.
        w.next_row();
        w.set(COL_A, LABEL_ID, &styles.title)?;
        let id_text = self.lesson.id.map(|v| v.to_string()).unwrap_or_default();
        w.set(COL_B, &id_text, &styles.centered)?;
        for (i, legend) in FIELD_LEGENDS.iter().enumerate() {
            w.set(COL_C + i as ColNum, legend, &styles.title)?;
        }

        // Row 2: title.
        w.next_row();
        w.set(COL_A, LABEL_TITLE, &styles.title)?;
        w.merge_cols(COL_B, COL_F, &self.lesson.title, &styles.centered)?;

        self.write_vocab_block(&mut w, &styles)?;
        self.write_sentence_block(&mut w, &styles)?;
        self.write_reading_block(&mut w, &styles)?;

        // Base style for the empty band below the content.
        let last_row = w.row;
        for row in (last_row + 1)..=MAX_STYLED_ROW {
            for col in 0..GRID_COLS {
                worksheet.write_blank(row - 1, col, &styles.base)?;
            }
        }

        // Reference glyphs for sheet editors, outside the content grid.
        for (i, glyph) in LONG_VOWEL_GLYPHS.iter().enumerate() {
            worksheet.write_string(0, ANNOTATION_COL + i as ColNum, *glyph)?;
        }

        Ok(())
    }

    fn write_vocab_block(&self, w: &mut SheetWriter, styles: &SheetStyles) -> Result<()> {
        let start_row = w.row + 1;
        let vocab = padded(&self.lesson.vocab, DEFAULT_VOCAB_COUNT);

        for word in &vocab {
            let label_format = &styles.orange_titles[w.orange_idx];

            w.next_row();
            w.set(COL_B, LABEL_FORMS, label_format)?;
            let forms = padded(&word.forms, DEFAULT_FORMS_COUNT);
            let mut stem_list = Vec::new();
            let mut prefixes_list = Vec::new();
            let mut suffices_list = Vec::new();
            let mut articles_list = Vec::new();
            for form in &forms {
                stem_list.push(form.stem.clone().unwrap_or_else(placeholder));
                prefixes_list.push(join_or_placeholder(form.prefixes.as_deref()));
                suffices_list.push(join_or_placeholder(form.suffices.as_deref()));
                articles_list.push(join_or_placeholder(form.articles.as_deref()));
            }
            w.set(COL_C, &stem_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 1, &prefixes_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 2, &suffices_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 3, &articles_list.join("\n"), &styles.cell)?;

            w.next_row();
            w.set(COL_B, LABEL_MEANINGS, label_format)?;
            let meanings = padded(&word.meanings, DEFAULT_FORMS_COUNT);
            let mut pos_list = Vec::new();
            let mut meanings_list = Vec::new();
            let mut labels_list = Vec::new();
            let mut usage_list = Vec::new();
            for meaning in &meanings {
                pos_list.push(meaning.pos.clone().unwrap_or_else(placeholder));
                meanings_list.push(if meaning.meanings.is_empty() {
                    placeholder()
                } else {
                    meaning.meanings.clone()
                });
                labels_list.push(join_or_placeholder(meaning.labels.as_deref()));
                usage_list.push(join_or_placeholder(meaning.usage.as_deref()));
            }
            w.set(COL_C, &pos_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 1, &meanings_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 2, &labels_list.join("\n"), &styles.cell)?;
            w.set(COL_C + 3, &usage_list.join("\n"), &styles.cell)?;

            w.next_row();
            w.set(COL_B, LABEL_EXPLANATION, label_format)?;
            let explanation = word.explanation.clone().unwrap_or_default();
            w.merge_cols(COL_C, COL_F, &explanation, &styles.cell)?;

            w.toggle_orange();
        }

        w.merge_rows(COL_A, start_row, w.row, LABEL_VOCABULARY, &styles.title)
    }

    fn write_sentence_block(&self, w: &mut SheetWriter, styles: &SheetStyles) -> Result<()> {
        let start_row = w.row + 1;
        let sentences = padded(&self.lesson.sentences, DEFAULT_SENTENCE_COUNT);

        for (slot, sentence) in sentences.iter().enumerate() {
            let label_format = &styles.orange_titles[w.orange_idx];
            let greek_first = slot < GREEK_FIRST_SLOTS;

            w.next_row();
            let label = if greek_first { LABEL_GREEK } else { LABEL_ENGLISH };
            w.set(COL_B, label, label_format)?;
            let text = sentence
                .greek
                .as_deref()
                .or(sentence.english.as_deref())
                .unwrap_or_default();
            w.merge_cols(COL_C, COL_F, text, &styles.cell)?;

            w.next_row();
            let label = if greek_first {
                LABEL_ENGLISH_ALT
            } else {
                LABEL_GREEK_ALT
            };
            w.set(COL_B, label, label_format)?;
            let text = sentence
                .english_
                .as_deref()
                .or(sentence.greek_.as_deref())
                .unwrap_or_default();
            w.merge_cols(COL_C, COL_F, text, &styles.cell)?;

            w.toggle_orange();
        }

        w.merge_rows(COL_A, start_row, w.row, LABEL_SENTENCES, &styles.title)
    }

    fn write_reading_block(&self, w: &mut SheetWriter, styles: &SheetStyles) -> Result<()> {
        let start_row = w.row + 1;
        let reading = self.lesson.reading.clone().unwrap_or_default();

        w.next_row();
        w.set(COL_B, LABEL_TITLE, &styles.title)?;
        w.merge_cols(COL_C, COL_F, &reading.title, &styles.cell)?;

        w.next_row();
        w.set(COL_B, LABEL_TEXT, &styles.title)?;
        w.merge_cols(COL_C, COL_F, &reading.text, &styles.cell)?;

        let vocab_start_row = w.row + 1;
        let vocab = padded(&reading.vocab, DEFAULT_READING_VOCAB_COUNT);
        for word in &vocab {
            w.next_row();
            w.set(COL_C, &word.word, &styles.cell)?;
            w.merge_cols(COL_C + 1, COL_F, &word.explanation, &styles.cell)?;
        }
        w.merge_rows(COL_B, vocab_start_row, w.row, LABEL_VOCABULARY, &styles.title)?;

        w.next_row();
        w.set(COL_B, LABEL_TRANSLATION, &styles.title)?;
        w.merge_cols(COL_C, COL_F, &reading.translation, &styles.cell)?;

        w.merge_rows(COL_A, start_row, w.row, LABEL_READING, &styles.title)
    }
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Comma-joins an affix/annotation list; a missing or empty list renders
/// as the `-` placeholder so the parallel columns keep one line per
/// element.
fn join_or_placeholder(list: Option<&[String]>) -> String {
    match list {
        Some(items) if !items.is_empty() => items.join(","),
        _ => placeholder(),
    }
}

/// An empty or missing list lays out as `n` placeholder entries so every
/// section keeps its shape for hand editing.
fn padded<T: Default + Clone>(list: &[T], n: usize) -> Vec<T> {
    if list.is_empty() {
        vec![T::default(); n]
    } else {
        list.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::{Form, Meaning, Reading, ReadingVocab, SentencePair, VocabEntry};
    use tempfile::NamedTempFile;
    use umya_spreadsheet::reader::xlsx::read as read_xlsx;
    use umya_spreadsheet::Border;

    fn write_and_read(lesson: Lesson) -> umya_spreadsheet::Spreadsheet {
        let generator = LessonSheetGenerator::new(lesson);
        let mut workbook = generator.to_workbook().unwrap();

        let temp_file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let temp_path = temp_file.path().to_path_buf();
        workbook.save(&temp_path).unwrap();

        read_xlsx(&temp_path).unwrap()
    }

    fn sample_lesson() -> Lesson {
        Lesson {
            id: Some(7),
            title: "Ch7".to_string(),
            vocab: vec![VocabEntry {
                forms: vec![
                    Form {
                        stem: Some("λογ".to_string()),
                        prefixes: None,
                        suffices: Some(vec!["ος".to_string(), "ου".to_string()]),
                        articles: Some(vec!["ὁ".to_string()]),
                    },
                    Form {
                        stem: Some("λεγ".to_string()),
                        prefixes: None,
                        suffices: None,
                        articles: None,
                    },
                ],
                meanings: vec![Meaning {
                    pos: Some("n".to_string()),
                    meanings: "word, speech".to_string(),
                    labels: None,
                    usage: Some(vec!["gen".to_string()]),
                }],
                explanation: Some("very common".to_string()),
            }],
            sentences: vec![
                SentencePair {
                    greek: Some("ὁ λόγος".to_string()),
                    english_: Some("the word".to_string()),
                    ..Default::default()
                },
                SentencePair::default(),
            ],
            reading: Some(Reading {
                title: "Passage".to_string(),
                text: "κείμενον".to_string(),
                vocab: vec![
                    ReadingVocab {
                        word: "λόγος".to_string(),
                        explanation: "word".to_string(),
                    },
                    ReadingVocab {
                        word: "ἔργον".to_string(),
                        explanation: "deed".to_string(),
                    },
                ],
                translation: "the translation".to_string(),
            }),
        }
    }

    #[test]
    fn test_generator_header_rows() {
        let book = write_and_read(sample_lesson());
        let sheet = book.get_sheet(&0).unwrap();

        assert_eq!(sheet.get_value((1, 1)).as_str(), "ID");
        assert_eq!(sheet.get_value((2, 1)).as_str(), "7");
        assert_eq!(sheet.get_value((3, 1)).as_str(), "STM/POS/WRD");
        assert_eq!(sheet.get_value((4, 1)).as_str(), "PRS/MNS/EXP");
        assert_eq!(sheet.get_value((5, 1)).as_str(), "SFS/LBS/EXP");
        assert_eq!(sheet.get_value((6, 1)).as_str(), "ARS/USG/EXP");

        assert_eq!(sheet.get_value((1, 2)).as_str(), "TITLE");
        assert_eq!(sheet.get_value((2, 2)).as_str(), "Ch7");
    }

    #[test]
    fn test_generator_vocab_block_parallel_columns() {
        let book = write_and_read(sample_lesson());
        let sheet = book.get_sheet(&0).unwrap();

        assert_eq!(sheet.get_value((2, 3)).as_str(), "FORMS");
        assert_eq!(sheet.get_value((3, 3)).as_str(), "λογ\nλεγ");
        assert_eq!(sheet.get_value((4, 3)).as_str(), "-\n-");
        assert_eq!(sheet.get_value((5, 3)).as_str(), "ος,ου\n-");
        assert_eq!(sheet.get_value((6, 3)).as_str(), "ὁ\n-");

        assert_eq!(sheet.get_value((2, 4)).as_str(), "MEANINGS");
        assert_eq!(sheet.get_value((3, 4)).as_str(), "n");
        assert_eq!(sheet.get_value((4, 4)).as_str(), "word, speech");
        assert_eq!(sheet.get_value((5, 4)).as_str(), "-");
        assert_eq!(sheet.get_value((6, 4)).as_str(), "gen");

        assert_eq!(sheet.get_value((2, 5)).as_str(), "EXPLANATION");
        assert_eq!(sheet.get_value((3, 5)).as_str(), "very common");

        assert_eq!(sheet.get_value((1, 3)).as_str(), "VOCABULARY");
    }

    #[test]
    fn test_generator_sentence_and_reading_blocks() {
        let book = write_and_read(sample_lesson());
        let sheet = book.get_sheet(&0).unwrap();

        // One vocab entry: rows 3-5. Sentences start at row 6.
        assert_eq!(sheet.get_value((1, 6)).as_str(), "SENTENCES");
        assert_eq!(sheet.get_value((2, 6)).as_str(), "GREEK");
        assert_eq!(sheet.get_value((3, 6)).as_str(), "ὁ λόγος");
        assert_eq!(sheet.get_value((2, 7)).as_str(), "ENGLISH_");
        assert_eq!(sheet.get_value((3, 7)).as_str(), "the word");
        // Placeholder pair renders empty.
        assert_eq!(sheet.get_value((2, 8)).as_str(), "GREEK");
        assert_eq!(sheet.get_value((3, 8)).as_str(), "");

        // Reading block: rows 10-14.
        assert_eq!(sheet.get_value((1, 10)).as_str(), "READING");
        assert_eq!(sheet.get_value((2, 10)).as_str(), "TITLE");
        assert_eq!(sheet.get_value((3, 10)).as_str(), "Passage");
        assert_eq!(sheet.get_value((2, 11)).as_str(), "TEXT");
        assert_eq!(sheet.get_value((3, 11)).as_str(), "κείμενον");
        assert_eq!(sheet.get_value((2, 12)).as_str(), "VOCABULARY");
        assert_eq!(sheet.get_value((3, 12)).as_str(), "λόγος");
        assert_eq!(sheet.get_value((4, 12)).as_str(), "word");
        assert_eq!(sheet.get_value((3, 13)).as_str(), "ἔργον");
        assert_eq!(sheet.get_value((2, 14)).as_str(), "TRANSLATION");
        assert_eq!(sheet.get_value((3, 14)).as_str(), "the translation");
    }

    #[test]
    fn test_generator_merge_ranges() {
        let book = write_and_read(sample_lesson());
        let sheet = book.get_sheet(&0).unwrap();

        let ranges: Vec<String> = sheet
            .get_merge_cells()
            .iter()
            .map(|v| v.get_range())
            .collect();

        // Section labels merged vertically.
        assert!(ranges.contains(&"A3:A5".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"A6:A9".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"A10:A14".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"B12:B13".to_string()), "{ranges:?}");
        // Wide value cells.
        assert!(ranges.contains(&"B2:F2".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"C5:F5".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"D12:F12".to_string()), "{ranges:?}");
    }

    #[test]
    fn test_generator_default_fill_counts() {
        let book = write_and_read(Lesson::default());
        let sheet = book.get_sheet(&0).unwrap();

        // 10 vocab entries: rows 3-32.
        for i in 0..10 {
            let row = 3 + 3 * i;
            assert_eq!(sheet.get_value((2, row)).as_str(), "FORMS");
            assert_eq!(sheet.get_value((3, row)).as_str(), "-");
            assert_eq!(sheet.get_value((2, row + 1)).as_str(), "MEANINGS");
            assert_eq!(sheet.get_value((4, row + 1)).as_str(), "-");
            assert_eq!(sheet.get_value((2, row + 2)).as_str(), "EXPLANATION");
        }
        // 15 sentence slots: rows 33-62, switching direction at slot 10.
        assert_eq!(sheet.get_value((2, 33)).as_str(), "GREEK");
        assert_eq!(sheet.get_value((2, 34)).as_str(), "ENGLISH_");
        assert_eq!(sheet.get_value((2, 51)).as_str(), "GREEK");
        assert_eq!(sheet.get_value((2, 53)).as_str(), "ENGLISH");
        assert_eq!(sheet.get_value((2, 54)).as_str(), "GREEK_");
        assert_eq!(sheet.get_value((2, 61)).as_str(), "ENGLISH");
        // Reading block: rows 63-75 with 10 vocab rows.
        assert_eq!(sheet.get_value((2, 63)).as_str(), "TITLE");
        assert_eq!(sheet.get_value((2, 64)).as_str(), "TEXT");
        assert_eq!(sheet.get_value((2, 65)).as_str(), "VOCABULARY");
        assert_eq!(sheet.get_value((2, 75)).as_str(), "TRANSLATION");

        let ranges: Vec<String> = sheet
            .get_merge_cells()
            .iter()
            .map(|v| v.get_range())
            .collect();
        assert!(ranges.contains(&"A3:A32".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"A33:A62".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"A63:A75".to_string()), "{ranges:?}");
        assert!(ranges.contains(&"B65:B74".to_string()), "{ranges:?}");
    }

    #[test]
    fn test_generator_borders_and_annotation() {
        let book = write_and_read(Lesson::default());
        let sheet = book.get_sheet(&0).unwrap();

        for (col, row) in [(1, 1), (2, 2), (3, 33), (6, 75)] {
            let style = sheet.get_style((col, row));
            let borders = style.get_borders().unwrap();
            assert_eq!(borders.get_top().get_border_style(), Border::BORDER_THIN);
            assert_eq!(borders.get_bottom().get_border_style(), Border::BORDER_THIN);
            assert_eq!(borders.get_left().get_border_style(), Border::BORDER_THIN);
            assert_eq!(borders.get_right().get_border_style(), Border::BORDER_THIN);
        }

        // Reference glyphs in H1:M1.
        for (i, glyph) in LONG_VOWEL_GLYPHS.iter().enumerate() {
            assert_eq!(sheet.get_value((8 + i as u32, 1)).as_str(), *glyph);
        }
    }

    #[test]
    fn test_generator_single_reading_vocab_row_is_not_merged() {
        let mut lesson = sample_lesson();
        lesson.reading.as_mut().unwrap().vocab = vec![ReadingVocab {
            word: "ἕν".to_string(),
            explanation: "one".to_string(),
        }];
        let book = write_and_read(lesson);
        let sheet = book.get_sheet(&0).unwrap();

        assert_eq!(sheet.get_value((2, 12)).as_str(), "VOCABULARY");
        let ranges: Vec<String> = sheet
            .get_merge_cells()
            .iter()
            .map(|v| v.get_range())
            .collect();
        assert!(!ranges.iter().any(|r| r.starts_with("B12")), "{ranges:?}");
    }
}
