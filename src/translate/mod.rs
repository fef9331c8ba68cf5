//! Row translation pass.
//!
//! Planning is pure ([`plan_jobs`]); the network call sits behind either the
//! [`Translator`] trait (native, tests, CLI) or the async fetch runner used
//! by the web handle. Either way each job is one sequential call, and the
//! results land in the grid as a single undoable action.

#[cfg(target_arch = "wasm32")]
pub(crate) mod fetch;
mod plan;

use serde::{Deserialize, Serialize};

use crate::editor::SheetEditor;

pub use plan::{
    find_name_rows, plan_jobs, LanguageSlots, TranslationJob, LANGUAGE_SLOTS, NAME_PREFIX,
    TARGET_ROW_OFFSET,
};

/// Body POSTed to the translation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Endpoint reply. Different backends use `translated` or `translatedText`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translated: Option<String>,
    #[serde(default, rename = "translatedText")]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranslateResponse {
    /// The translated text, or `fallback` when the reply carries none.
    #[must_use]
    pub fn into_text(self, fallback: &str) -> String {
        self.translated
            .filter(|t| !t.is_empty())
            .or(self.translated_text.filter(|t| !t.is_empty()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// A synchronous translation backend.
pub trait Translator {
    /// Translate one request. `None` keeps the source text.
    fn translate(&self, request: &TranslateRequest) -> Option<String>;
}

/// Plan, translate, and apply in one go. Returns the number of cells updated.
pub fn run_translation<T: Translator + ?Sized>(editor: &mut SheetEditor, translator: &T) -> usize {
    let jobs = editor.translation_jobs();
    log::debug!("translating {} cell(s)", jobs.len());
    let results: Vec<_> = jobs
        .iter()
        .map(|job| {
            let request = job.request();
            let text = translator.translate(&request).unwrap_or_else(|| {
                log::warn!("no translation for {:?}, keeping source text", job.coord);
                request.text.clone()
            });
            (job.coord, text)
        })
        .collect();
    editor.apply_translations(results)
}
