//! Trigger URI parsing.
//!
//! The agent is registered as the handler for a custom URI scheme.  The URI's
//! authority names the action (`quicksearch`), and the search query travels in
//! one of four shapes, tried in priority order:
//!
//! | Shape                               | Example                                   |
//! |-------------------------------------|-------------------------------------------|
//! | query-string parameter `q`          | `playnite://quicksearch?q=Hollow%20Knight` |
//! | segments `qb64/<base64 of UTF-8>`   | `playnite://quicksearch/qb64/SGVsbG8=`    |
//! | segments `q/<percent-encoded>`      | `playnite://quicksearch/q/Hades%20II`     |
//! | anything else                       | `playnite://quicksearch/Dead/Cells`       |
//!
//! The last shape joins every path segment with spaces.  No path segments and
//! no `q` parameter means an empty query, which is a legal no-op request.
//!
//! Decoding failures never surface as errors: undecodable base64 yields an
//! empty query and invalid percent-escapes are decoded lossily.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use percent_encoding::percent_decode_str;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Path segments and raw query string of a trigger URI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TriggerParts {
    /// Non-empty path segments, still percent-encoded.
    segments: Vec<String>,
    /// Query string without the leading `?`.
    query: Option<String>,
}

impl TriggerParts {
    fn from_uri(uri: &str) -> Self {
        match Url::parse(uri.trim()) {
            Ok(url) => Self {
                segments: url
                    .path_segments()
                    .map(|segments| segments.filter(|s| !s.is_empty()).map(str::to_string).collect())
                    .unwrap_or_default(),
                query: url.query().map(str::to_string),
            },
            Err(_) => Self::from_relative(uri.trim()),
        }
    }

    /// Splits a string that is not an absolute URI, e.g. `q/foo`.
    fn from_relative(text: &str) -> Self {
        let (path, query) = match text.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (text, None),
        };
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query,
        }
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Returns the second segment when the first one equals `marker`.
    ///
    /// A marker anywhere else is ordinary query text.
    fn value_after_leading(&self, marker: &str) -> Option<&str> {
        match self.segments.as_slice() {
            [first, value, ..] if first.eq_ignore_ascii_case(marker) => Some(value.as_str()),
            _ => None,
        }
    }
}

fn percent_decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}

/// Decodes base64 with any common alphabet/padding; `None` if nothing fits or
/// the bytes are not UTF-8.
fn decode_base64_utf8(text: &str) -> Option<String> {
    let bytes = [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(text).ok())?;
    String::from_utf8(bytes).ok()
}

/// Extracts the search query from a trigger URI.
///
/// Never fails; see the module docs for the accepted shapes.
pub fn parse_trigger_query(uri: &str) -> String {
    let parts = TriggerParts::from_uri(uri);

    if let Some(query) = parts.query_param("q") {
        debug!("trigger query from `q` parameter");
        return query;
    }

    if let Some(encoded) = parts.value_after_leading("qb64") {
        debug!("trigger query from `qb64` segment");
        return decode_base64_utf8(&percent_decode(encoded)).unwrap_or_else(|| {
            debug!("undecodable base64 in trigger; using empty query");
            String::new()
        });
    }

    if let Some(encoded) = parts.value_after_leading("q") {
        debug!("trigger query from `q` segment");
        return percent_decode(encoded);
    }

    percent_decode(&parts.segments.join(" "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Priority 1: query-string parameter ────────────────────────────────────

    #[test]
    fn test_query_parameter_is_percent_decoded() {
        assert_eq!(
            parse_trigger_query("playnite://quicksearch?q=Hollow%20Knight"),
            "Hollow Knight"
        );
    }

    #[test]
    fn test_query_parameter_plus_is_space() {
        assert_eq!(parse_trigger_query("playnite://quicksearch?q=Dead+Cells"), "Dead Cells");
    }

    #[test]
    fn test_query_parameter_wins_over_segments() {
        assert_eq!(
            parse_trigger_query("playnite://quicksearch/qb64/SGVsbG8=?q=Celeste"),
            "Celeste"
        );
    }

    #[test]
    fn test_query_parameter_among_others() {
        assert_eq!(
            parse_trigger_query("playnite://quicksearch?source=web&q=Ori&x=1"),
            "Ori"
        );
    }

    // ── Priority 2: qb64 segments ─────────────────────────────────────────────

    #[test]
    fn test_qb64_segment() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/qb64/SGVsbG8="), "Hello");
    }

    #[test]
    fn test_qb64_segment_unpadded_and_percent_encoded_padding() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/qb64/SGVsbG8"), "Hello");
        assert_eq!(parse_trigger_query("playnite://quicksearch/qb64/SGVsbG8%3D"), "Hello");
    }

    #[test]
    fn test_qb64_segment_utf8() {
        // "Pokémon" in UTF-8, base64 encoded.
        assert_eq!(parse_trigger_query("playnite://quicksearch/qb64/UG9rw6ltb24="), "Pokémon");
    }

    #[test]
    fn test_qb64_undecodable_yields_empty_query() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/qb64/!!!not-base64"), "");
    }

    // ── Priority 3: q segments ────────────────────────────────────────────────

    #[test]
    fn test_q_segment() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/q/Hades%20II"), "Hades II");
    }

    // ── Priority 4: joined fallback ───────────────────────────────────────────

    #[test]
    fn test_fallback_joins_segments_with_spaces() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/Dead/Cells"), "Dead Cells");
    }

    #[test]
    fn test_markers_after_first_segment_are_plain_text() {
        assert_eq!(
            parse_trigger_query("playnite://quicksearch/Mario/q/Luigi"),
            "Mario q Luigi"
        );
        assert_eq!(
            parse_trigger_query("playnite://quicksearch/Tom/qb64/SGVsbG8="),
            "Tom qb64 SGVsbG8="
        );
    }

    #[test]
    fn test_lone_marker_segment_falls_back_to_join() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/q"), "q");
    }

    #[test]
    fn test_fallback_decodes_lossily() {
        assert_eq!(parse_trigger_query("playnite://quicksearch/50%25%20off"), "50% off");
    }

    #[test]
    fn test_no_segments_is_empty_query() {
        assert_eq!(parse_trigger_query("playnite://quicksearch"), "");
        assert_eq!(parse_trigger_query("playnite://quicksearch/"), "");
        assert_eq!(parse_trigger_query(""), "");
    }

    #[test]
    fn test_relative_input_is_accepted() {
        assert_eq!(parse_trigger_query("q/Tunic"), "Tunic");
        assert_eq!(parse_trigger_query("search?q=Hi%21"), "Hi!");
    }
}
