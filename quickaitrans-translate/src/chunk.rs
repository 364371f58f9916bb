//! Size-bounded chunking of diff payloads and the [`Translator`] seam.
//!
//! Entries are packed greedily into chunks whose JSON-serialized size
//! stays under [`MAX_CHUNK_BYTES`]. An oversized subtree is descended
//! into and chunked on its own; an oversized leaf is carried over
//! untranslated. A chunk whose answer cannot be decoded is skipped — its
//! keys stay missing and reappear in the next run's diff.

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::client::{ChatBackend, ChatClient, ChatMessage};
use crate::error::TranslateError;

/// Upper bound, in JSON-serialized bytes, for one translation chunk.
pub const MAX_CHUNK_BYTES: usize = 4000;

/// Token budget for a single completion.
const MAX_COMPLETION_TOKENS: u32 = 4000;

/// Language pair and optional app context for one translation call.
#[derive(Debug, Clone)]
pub struct TranslationRequest<'a> {
    pub source_language: &'a str,
    pub destination_language: &'a str,
    pub app_info: Option<&'a str>,
}

/// Turn a plain nested string mapping into a translated mapping with the
/// same key set. No ordering contract on either side.
pub trait Translator {
    fn translate(
        &self,
        source: &Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError>;
}

/// Chunking translator backed by a chat-completion client.
pub struct AiTranslator<C = ChatClient> {
    client: C,
}

impl<C: ChatBackend> AiTranslator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn translate_level(
        &self,
        source: &Map<String, Value>,
        request: &TranslationRequest<'_>,
        breadcrumbs: &[&str],
    ) -> Map<String, Value> {
        let mut translated = Map::new();
        let mut chunk = Map::new();
        let mut chunk_bytes = 0usize;

        for (key, content) in source {
            if breadcrumbs.is_empty() {
                info!("translating '{key}'");
            }
            let content_bytes = json_len(content);
            if content_bytes > MAX_CHUNK_BYTES {
                self.flush_chunk(&mut chunk, &mut chunk_bytes, &mut translated, request);
                match content {
                    Value::String(text) => {
                        error!("value of '{key}' exceeds the chunk limit; keeping the source text");
                        translated.insert(key.clone(), Value::String(text.clone()));
                    }
                    Value::Object(inner) => {
                        let mut nested_crumbs = breadcrumbs.to_vec();
                        nested_crumbs.push(key);
                        debug!("descending into '{}'", nested_crumbs.join("->"));
                        let nested = self.translate_level(inner, request, &nested_crumbs);
                        translated.insert(key.clone(), Value::Object(nested));
                    }
                    other => {
                        warn!(
                            "skipping '{key}': unexpected {} in translation payload",
                            kind_of(other)
                        );
                    }
                }
                continue;
            }
            if chunk_bytes + content_bytes >= MAX_CHUNK_BYTES {
                self.flush_chunk(&mut chunk, &mut chunk_bytes, &mut translated, request);
            }
            chunk_bytes += content_bytes;
            chunk.insert(key.clone(), content.clone());
        }
        self.flush_chunk(&mut chunk, &mut chunk_bytes, &mut translated, request);
        translated
    }

    /// Send the pending chunk and fold the answer into `translated`.
    /// Failures are logged and the chunk's keys are dropped.
    fn flush_chunk(
        &self,
        chunk: &mut Map<String, Value>,
        chunk_bytes: &mut usize,
        translated: &mut Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) {
        if chunk.is_empty() {
            return;
        }
        debug!("handling a {chunk_bytes} byte chunk of {} key(s)", chunk.len());
        let payload = std::mem::take(chunk);
        *chunk_bytes = 0;
        match self.request_chunk(&payload, request) {
            Ok(answer) => translated.extend(answer),
            Err(err) => warn!("chunk of {} key(s) skipped: {err}", payload.len()),
        }
    }

    fn request_chunk(
        &self,
        payload: &Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError> {
        let body = Value::Object(payload.clone()).to_string();
        let prompt = build_prompt(&body, "JSON", request);
        let answer = self
            .client
            .complete(&[ChatMessage::user(prompt)], MAX_COMPLETION_TOKENS)?;
        parse_answer(&answer)
    }
}

impl<C: ChatBackend> Translator for AiTranslator<C> {
    fn translate(
        &self,
        source: &Map<String, Value>,
        request: &TranslationRequest<'_>,
    ) -> Result<Map<String, Value>, TranslateError> {
        Ok(self.translate_level(source, request, &[]))
    }
}

/// Build the translation instruction around one serialized chunk.
fn build_prompt(content: &str, format: &str, request: &TranslationRequest<'_>) -> String {
    let mut prompt = String::from("You are now a translator for an app.\n");
    if let Some(app_info) = request.app_info {
        prompt.push_str(app_info);
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(&format!(
        "Please translate this {format} from \"{}\" to \"{}\":\n```\n{content}\n```\n\
         Only type the result itself.\nDo not translate the keys.",
        request.source_language, request.destination_language
    ));
    prompt
}

/// Strip markdown fences and decode the model's answer as a nested
/// string mapping.
fn parse_answer(answer: &str) -> Result<Map<String, Value>, TranslateError> {
    let cleaned = answer.replace("```json", "").replace("```", "");
    let value: Value =
        serde_json::from_str(cleaned.trim()).map_err(|err| TranslateError::MalformedResponse {
            reason: err.to_string(),
        })?;
    let Value::Object(map) = value else {
        return Err(TranslateError::MalformedResponse {
            reason: "answer is not a JSON object".to_string(),
        });
    };
    ensure_nested_strings(&map)?;
    Ok(map)
}

fn ensure_nested_strings(map: &Map<String, Value>) -> Result<(), TranslateError> {
    for (key, value) in map {
        match value {
            Value::String(_) => {}
            Value::Object(inner) => ensure_nested_strings(inner)?,
            other => {
                return Err(TranslateError::MalformedResponse {
                    reason: format!("'{key}' is {}, expected a string or object", kind_of(other)),
                })
            }
        }
    }
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn json_len(value: &Value) -> usize {
    value.to_string().len()
}
