use crate::generator::LessonSheetGenerator;
use crate::lesson::Lesson;
use crate::parser::LessonSheetParser;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use umya_spreadsheet::reader::xlsx::read as read_xlsx;

/// Timestamp suffix used in default output names.
pub fn timestamp() -> String {
    chrono::Local::now().format("%y%m%d%H%M%S").to_string()
}

/// Default workbook path for `encode`: the input name with its `.json`
/// suffix replaced by `_<timestamp>.xlsx`. With no input file (an empty
/// lesson), `lesson_<timestamp>.xlsx`.
pub fn default_encode_output(json_path: Option<&Path>, timestamp: &str) -> PathBuf {
    match json_path {
        Some(path) => derive_output(path, ".json", timestamp, "xlsx"),
        None => PathBuf::from(format!("lesson_{timestamp}.xlsx")),
    }
}

/// Default JSON path for `decode`: the input name with its `.xlsx` suffix
/// replaced by `_<timestamp>.json`.
pub fn default_decode_output(xlsx_path: &Path, timestamp: &str) -> PathBuf {
    derive_output(xlsx_path, ".xlsx", timestamp, "json")
}

fn derive_output(path: &Path, strip: &str, timestamp: &str, extension: &str) -> PathBuf {
    let text = path.to_string_lossy();
    let stem = text.strip_suffix(strip).unwrap_or(&text);
    PathBuf::from(format!("{stem}_{timestamp}.{extension}"))
}

/// Encodes a JSON lesson file into a workbook. A missing input file (or
/// `None` for a fresh lesson) encodes the empty lesson; malformed JSON is
/// an error.
pub fn run_encode(json_path: Option<&Path>, xlsx_path: &Path) -> Result<()> {
    let lesson = match json_path {
        Some(path) => read_lesson(path)?,
        None => Lesson::default(),
    };

    let generator = LessonSheetGenerator::new(lesson);
    let mut workbook = generator.to_workbook()?;
    workbook
        .save(xlsx_path)
        .with_context(|| format!("failed to save workbook to {}", xlsx_path.display()))?;

    info!(output = %xlsx_path.display(), "lesson encoded");
    Ok(())
}

/// Decodes a lesson workbook into a JSON file.
pub fn run_decode(xlsx_path: &Path, json_path: &Path) -> Result<()> {
    let book = read_xlsx(xlsx_path)
        .map_err(|e| anyhow!("failed to read workbook {}: {e:?}", xlsx_path.display()))?;
    let sheet = book
        .get_sheet(&0)
        .ok_or_else(|| anyhow!("workbook {} has no sheets", xlsx_path.display()))?;

    let parser = LessonSheetParser::new(xlsx_path.to_string_lossy());
    let lesson = parser.parse(sheet)?;

    save_lesson(&lesson, json_path)?;
    info!(output = %json_path.display(), "lesson decoded");
    Ok(())
}

fn read_lesson(path: &Path) -> Result<Lesson> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("malformed lesson JSON in {}", path.display())),
        // A missing input is a fresh lesson, same as --new.
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Lesson::default()),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn save_lesson(lesson: &Lesson, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(lesson)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
