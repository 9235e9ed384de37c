use serde::{Deserialize, Serialize};

/// The root document representing one language lesson.
///
/// This is the canonical machine-readable form; the spreadsheet view is a
/// fixed layout rendered from and parsed back into this tree. All child
/// structures are owned by value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson number. Absent in hand-written input files; always present
    /// after decoding a sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Lesson title.
    #[serde(default)]
    pub title: String,
    /// Vocabulary entries, in sheet order.
    #[serde(default)]
    pub vocab: Vec<VocabEntry>,
    /// Bilingual example sentences, in sheet order.
    #[serde(default)]
    pub sentences: Vec<SentencePair>,
    /// Optional reading passage. Dropped entirely when its title is blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<Reading>,
}

/// One vocabulary word: its inflected forms, its senses, and an optional
/// free-text explanation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabEntry {
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One inflected form of a vocabulary word.
///
/// On the sheet the forms of an entry are stored as four parallel
/// newline-joined columns (stem / prefixes / suffices / articles); the
/// affix lists are comma-joined within their line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<String>>,
}

/// One sense of a vocabulary word.
///
/// `meanings` is required free text; the sheet stores a `-` placeholder
/// when it is missing and the decoder keeps whatever text it finds
/// verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default)]
    pub meanings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<String>>,
}

/// A bilingual example sentence.
///
/// The first ten sentence slots store the pair Greek-first (`greek` +
/// `english_`), later slots English-first (`english` + `greek_`). A pair
/// with all fields absent is the empty placeholder slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentencePair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greek: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greek_: Option<String>,
}

/// An extended reading passage with its own vocabulary glosses and a
/// translation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub vocab: Vec<ReadingVocab>,
    #[serde(default)]
    pub translation: String,
}

/// A single glossed word in the reading passage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadingVocab {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_deserialize_empty_object() {
        let lesson: Lesson = serde_json::from_str("{}").unwrap();
        assert_eq!(lesson, Lesson::default());
        assert!(lesson.id.is_none());
        assert!(lesson.title.is_empty());
        assert!(lesson.vocab.is_empty());
        assert!(lesson.sentences.is_empty());
        assert!(lesson.reading.is_none());
    }

    #[test]
    fn test_lesson_deserialize_partial() {
        let lesson: Lesson = serde_json::from_str(r#"{"id": 3, "title": "Ch3"}"#).unwrap();
        assert_eq!(lesson.id, Some(3));
        assert_eq!(lesson.title, "Ch3");
        assert!(lesson.vocab.is_empty());
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let lesson = Lesson {
            id: Some(1),
            title: "T".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&lesson).unwrap();
        assert!(!json.contains("reading"));
        assert!(!json.contains("\"id\":null"));

        let form = Form {
            stem: Some("λογ".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(json, r#"{"stem":"λογ"}"#);
    }

    #[test]
    fn test_sentence_pair_field_names() {
        let pair: SentencePair =
            serde_json::from_str(r#"{"greek": "α", "english_": "a"}"#).unwrap();
        assert_eq!(pair.greek.as_deref(), Some("α"));
        assert_eq!(pair.english_.as_deref(), Some("a"));
        assert!(pair.english.is_none());
        assert!(pair.greek_.is_none());

        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"greek":"α","english_":"a"}"#);
    }

    #[test]
    fn test_meaning_roundtrip_keeps_field_order() {
        let meaning = Meaning {
            pos: Some("n".to_string()),
            meanings: "word, speech".to_string(),
            labels: None,
            usage: Some(vec!["gen".to_string(), "dat".to_string()]),
        };
        let json = serde_json::to_string(&meaning).unwrap();
        assert_eq!(
            json,
            r#"{"pos":"n","meanings":"word, speech","usage":["gen","dat"]}"#
        );
        let back: Meaning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meaning);
    }
}
