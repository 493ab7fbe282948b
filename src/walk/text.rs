//! Text walks over literal attachments.
//!
//! For an entity with literals, each literal becomes the walk
//! `entity predicate tok1 tok2 ...`, its content tokenized by [`tokenize`].

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::graph::TripleIndex;
use crate::symbol::SymbolId;

// ── Regex patterns ──────────────────────────────────────────────────────

/// A quoted literal with an optional `@lang` or `^^datatype` suffix.
static RE_ANNOTATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^"(.*)"(?:@[A-Za-z0-9-]+|\^\^\S+)?$"#).unwrap()
});

/// Split literal text into lower-case word tokens.
///
/// Language and datatype annotations are stripped, the text is NFC
/// normalized, and every character that is neither alphanumeric nor
/// whitespace is dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let body = RE_ANNOTATED
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |m| m.as_str());

    let cleaned: String = body
        .nfc()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Text walks of `entity`, one per literal, or one per sliding window of
/// `window` tokens when a literal is longer than that.
///
/// Literals that tokenize to nothing yield no walk.
pub fn text_walks(index: &TripleIndex, entity: SymbolId, window: Option<usize>) -> Vec<String> {
    let Some(literals) = index.literals_of(entity) else {
        return Vec::new();
    };
    let subject = index.label(entity);

    let mut walks = Vec::new();
    for (&predicate, texts) in literals {
        let prefix = format!("{subject} {}", index.label(predicate));
        for text in texts {
            let tokens = tokenize(text);
            if tokens.is_empty() {
                continue;
            }
            match window {
                Some(w) if w > 0 && tokens.len() > w => {
                    walks.extend(
                        tokens
                            .windows(w)
                            .map(|chunk| format!("{prefix} {}", chunk.join(" "))),
                    );
                }
                _ => walks.push(format!("{prefix} {}", tokens.join(" "))),
            }
        }
    }
    walks
}
