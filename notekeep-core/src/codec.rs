//! Record codec
//!
//! Serializes one note to a single self-terminated JSON line and back. The
//! line is the unit the data log stores; an index entry's offset/length must
//! bound exactly one encoded line.

use crate::{Note, Result, StoreError};

/// Encode a note as one newline-terminated JSON line
pub fn encode(note: &Note) -> Result<String> {
    let mut line = serde_json::to_string(note)
        .map_err(|e| StoreError::Corruption(format!("encode note {}: {}", note.id, e)))?;
    line.push('\n');
    Ok(line)
}

/// Decode a note from a stored line
///
/// Fails with `Corruption` if the line is not well-formed JSON or is missing
/// a required field.
pub fn decode(line: &str) -> Result<Note> {
    serde_json::from_str(line.trim_end())
        .map_err(|e| StoreError::Corruption(format!("decode note line: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::now_ms;

    fn sample_note() -> Note {
        Note {
            id: 7,
            title: "Dinner ideas".to_string(),
            text: "Steak, pasta, salad".to_string(),
            created_at: now_ms(),
            updated_at: now_ms(),
        }
    }

    #[test]
    fn test_round_trip() {
        let note = sample_note();
        let line = encode(&note).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let decoded = decode(&line).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_decode_without_trailing_newline() {
        let note = sample_note();
        let line = encode(&note).unwrap();
        let decoded = decode(line.trim_end()).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("not json at all").unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        // No `text` field
        let err = decode(r#"{"id":1,"title":"a","createdAt":"2025-10-16T19:30:00.000Z","updatedAt":"2025-10-16T19:30:00.000Z"}"#)
            .unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_timestamps_survive_encoding() {
        let note = sample_note();
        let decoded = decode(&encode(&note).unwrap()).unwrap();
        assert_eq!(decoded.created_at, note.created_at);
        assert_eq!(decoded.updated_at, note.updated_at);
    }
}
