use encoding_rs::{Encoding, UTF_8};

/// Encodings tried, in order, when the config doesn't list any.
/// `windows-1252` stands in for latin-1 (WHATWG maps the label the same way).
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "windows-1251", "windows-1252"];

/// Turns raw subprocess output into text using an ordered list of candidate
/// encodings. Decoding is total: the last resort is a lossy decode with the
/// first candidate, so callers always get a `String` back.
#[derive(Debug, Clone)]
pub struct Decoder {
    candidates: Vec<&'static Encoding>,
}

impl Decoder {
    /// Build a decoder from WHATWG encoding labels ("utf-8", "cp1251", "latin1", ...).
    /// Unknown labels are skipped; an empty result falls back to UTF-8.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut candidates: Vec<&'static Encoding> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            match Encoding::for_label(label.as_bytes()) {
                Some(encoding) => {
                    if !candidates.contains(&encoding) {
                        candidates.push(encoding);
                    }
                }
                None => log::warn!("Unknown output encoding '{}', skipping", label),
            }
        }
        if candidates.is_empty() {
            candidates.push(UTF_8);
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[&'static Encoding] {
        &self.candidates
    }

    /// Decode with the first candidate that accepts the input without
    /// malformed sequences, else force-decode with the first candidate.
    pub fn decode(&self, bytes: &[u8]) -> String {
        for encoding in &self.candidates {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
                if *encoding != UTF_8 {
                    log::debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());
                }
                return text.into_owned();
            }
        }
        let (text, _had_errors) = self.candidates[0].decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::from_labels(DEFAULT_ENCODINGS)
    }
}
