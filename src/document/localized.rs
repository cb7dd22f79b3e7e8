use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user-facing text field.
///
/// Before localization such a field holds a bare value (almost always a
/// string). Afterwards it is a mapping from language tag to text, e.g.
/// `{"base": "Red"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Translations(Map<String, Value>),
    Bare(Value),
}

impl LocalizedText {
    pub fn bare(text: impl Into<String>) -> Self {
        LocalizedText::Bare(Value::String(text.into()))
    }

    pub fn translated(language: &str, text: impl Into<String>) -> Self {
        let mut translations = Map::new();
        translations.insert(language.to_string(), Value::String(text.into()));
        LocalizedText::Translations(translations)
    }

    pub fn is_localized(&self) -> bool {
        matches!(self, LocalizedText::Translations(_))
    }

    /// Wraps a bare value into a single-entry mapping keyed by `language`.
    /// Already localized text is left alone.
    pub fn localize(&mut self, language: &str) {
        if let LocalizedText::Bare(value) = self {
            let mut translations = Map::new();
            translations.insert(language.to_string(), value.take());
            *self = LocalizedText::Translations(translations);
        }
    }

    /// Sets the text for one language, localizing the field first if needed.
    pub fn set(&mut self, language: &str, text: impl Into<String>) {
        self.localize(language);
        if let LocalizedText::Translations(translations) = self {
            translations.insert(language.to_string(), Value::String(text.into()));
        }
    }

    /// The text for `language`, or the bare text when not localized.
    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedText::Translations(translations) => {
                translations.get(language).and_then(Value::as_str)
            }
            LocalizedText::Bare(value) => value.as_str(),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        LocalizedText::bare(text)
    }
}
