//! Heuristic extractor: recovers gesture strings from settings-file content.
//!
//! Two strategies are tried per file, in order:
//!
//! 1. **Structured** – parse the content as a JSON5 tree (a superset of JSON,
//!    so hand-edited files with comments or trailing commas still parse) and
//!    visit every string-valued field whose key mentions "hotkey" or
//!    "shortcut".
//! 2. **Text patterns** – when the tree strategy yields nothing, scan lines for
//!    `<qualifier>Hotkey: <value>` / `<qualifier>Shortcut = <value>`, and as a
//!    last resort take the first modifier combination found anywhere.
//!
//! # Slot classification
//!
//! A key mentioning "global" fills the global slot.  Everything else fills the
//! in-app slot, including keys that carry no qualifier at all.  That default is
//! a guess that favours the more common binding, not a convention any
//! particular application is known to follow.

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use super::{ExtractionResult, HotkeySlot};

/// Substrings that mark a key name as describing a shortcut.
const KEY_TERMS: [&str; 2] = ["hotkey", "shortcut"];

/// Substrings that mark a key as the in-app binding (the host name is added
/// at runtime).
const IN_APP_TERMS: [&str; 5] = ["inapp", "in_app", "local", "open", "activation"];

/// How a matching key name was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// The key mentions "global".
    Global,
    /// The key carries an explicit in-app qualifier.
    InApp,
    /// No qualifier; treated as in-app.
    Ambiguous,
}

impl KeyClass {
    /// Slot the classified key fills.
    pub fn slot(self) -> HotkeySlot {
        match self {
            KeyClass::Global => HotkeySlot::Global,
            KeyClass::InApp | KeyClass::Ambiguous => HotkeySlot::InApp,
        }
    }
}

/// Returns `true` if `key` mentions a hotkey or shortcut (case-insensitively).
pub fn is_shortcut_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    KEY_TERMS.iter().any(|term| lowered.contains(term))
}

/// Classifies a shortcut key name; `host_name` is the host application's name.
pub fn classify_key_name(key: &str, host_name: &str) -> KeyClass {
    let lowered = key.to_lowercase();
    if lowered.contains("global") {
        return KeyClass::Global;
    }
    let host = host_name.to_lowercase();
    let host_match = !host.is_empty() && lowered.contains(&host);
    if host_match || IN_APP_TERMS.iter().any(|term| lowered.contains(term)) {
        KeyClass::InApp
    } else {
        KeyClass::Ambiguous
    }
}

/// Extractor configured for one host application.
///
/// Holds the compiled text patterns so a scan compiles them once.
#[derive(Debug, Clone)]
pub struct HotkeyExtractor {
    host_name: String,
    qualified_line: Option<Regex>,
    modifier_combo: Option<Regex>,
}

impl HotkeyExtractor {
    /// Builds an extractor; `host_name` joins the qualifier lists.
    pub fn new(host_name: &str) -> Self {
        let host_name = host_name.trim().to_string();
        let mut qualifiers = vec!["InApp", "Local", "Open", "Activation", "Global"]
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if !host_name.is_empty() {
            qualifiers.insert(2, regex::escape(&host_name));
        }

        let qualified_line = Regex::new(&format!(
            r#"(?i)(?P<qualifier>{})[ _-]?(?:Hotkey|Shortcut)\w*["']?\s*[:=]\s*["']?(?P<value>[^"'\r\n,;{{}}]+)"#,
            qualifiers.join("|")
        ))
        .ok();

        Self {
            host_name,
            qualified_line,
            modifier_combo: modifier_combo_regex(),
        }
    }

    /// Runs the structured strategy, falling back to text patterns when it
    /// produced no value.
    pub fn extract(&self, content: &str) -> ExtractionResult {
        match self.extract_structured(content) {
            Some(result) if !result.is_empty() => result,
            _ => self.extract_text(content),
        }
    }

    /// Walks the parsed tree depth-first.  Returns `None` if parsing failed.
    pub fn extract_structured(&self, content: &str) -> Option<ExtractionResult> {
        let tree: Value = match json5::from_str(content) {
            Ok(tree) => tree,
            Err(e) => {
                trace!("structured parse failed: {e}");
                return None;
            }
        };
        let mut result = ExtractionResult::default();
        self.visit(&tree, &mut result);
        Some(result)
    }

    fn visit(&self, node: &Value, result: &mut ExtractionResult) {
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    if let Value::String(text) = child {
                        if is_shortcut_key(key) {
                            let class = classify_key_name(key, &self.host_name);
                            result.offer(class.slot(), text);
                        }
                    }
                    self.visit(child, result);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item, result);
                }
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    /// Line-oriented fallback for content the tree parser rejects.
    ///
    /// Every qualified key on a line is considered, so minified or truncated
    /// JSON still fills both slots.
    pub fn extract_text(&self, content: &str) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        if let Some(re) = &self.qualified_line {
            for caps in content.lines().flat_map(|line| re.captures_iter(line)) {
                let qualifier = caps.name("qualifier").map(|m| m.as_str()).unwrap_or("");
                let value = caps.name("value").map(|m| m.as_str()).unwrap_or("");
                let slot = if qualifier.to_lowercase().contains("global") {
                    HotkeySlot::Global
                } else {
                    HotkeySlot::InApp
                };
                result.offer(slot, value);
            }
        }

        if result.is_empty() {
            if let Some(combo) = self.modifier_combo.as_ref().and_then(|re| re.find(content)) {
                result.offer(HotkeySlot::InApp, combo.as_str());
            }
        }
        result
    }
}

/// Pattern for a standalone modifier combination such as `Ctrl + Shift + F`.
fn modifier_combo_regex() -> Option<Regex> {
    const MODIFIER: &str = "(?:ctrl|control|alt|shift|win|windows|meta)";
    Regex::new(&format!(
        r"(?i)\b{MODIFIER}(?:\s*\+\s*{MODIFIER})*\s*\+\s*[a-z0-9]+\b"
    ))
    .ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
