//! Line-by-line rewrite of the upstream reply stream.
//!
//! Every upstream line produces at most one output line, in arrival order, and
//! each output line is yielded as soon as it is complete. Lines that carry no
//! payload are dropped; a line that fails to parse is logged and skipped.

use bytes::{Bytes, BytesMut};
use copilot_types::ProxyError;
use futures::{Stream, StreamExt};
use serde_json::{Map, Value};
use std::fmt::Display;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "data: [DONE]";

const CHAT_COMPLETION_CHUNK: &str = "chat.completion.chunk";
const CHAT_COMPLETION: &str = "chat.completion";
const EMBEDDING_LIST: &str = "list";
const EMBEDDING_ITEM: &str = "embedding";

/// Longest upstream line buffered while waiting for its terminator.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeKind {
    Chat,
    Embeddings,
}

/// Per-request context for the rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    pub requested_model: String,
    pub is_streaming: bool,
    pub kind: TranscodeKind,
}

impl TranscodeOptions {
    pub fn chat(requested_model: impl Into<String>, is_streaming: bool) -> Self {
        Self { requested_model: requested_model.into(), is_streaming, kind: TranscodeKind::Chat }
    }

    pub fn embeddings(requested_model: impl Into<String>) -> Self {
        Self {
            requested_model: requested_model.into(),
            is_streaming: false,
            kind: TranscodeKind::Embeddings,
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_i64() == Some(0) || n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn backfill(object: &mut Map<String, Value>, key: &str, value: impl FnOnce() -> Value) {
    if is_blank(object.get(key)) {
        object.insert(key.to_string(), value());
    }
}

fn non_empty_array(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_array).is_some_and(|items| !items.is_empty())
}

fn rewrite_chat(payload: &mut Map<String, Value>, options: &TranscodeOptions, now: i64) -> bool {
    if !non_empty_array(payload, "choices") {
        return false;
    }
    let object = if options.is_streaming { CHAT_COMPLETION_CHUNK } else { CHAT_COMPLETION };
    backfill(payload, "object", || Value::from(object));
    backfill(payload, "model", || Value::from(options.requested_model.as_str()));
    backfill(payload, "created", || Value::from(now));
    true
}

fn rewrite_embeddings(
    payload: &mut Map<String, Value>,
    options: &TranscodeOptions,
) -> bool {
    if !non_empty_array(payload, "data") {
        return false;
    }
    backfill(payload, "object", || Value::from(EMBEDDING_LIST));
    if let Some(items) = payload.get_mut("data").and_then(Value::as_array_mut) {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            backfill(item, "object", || Value::from(EMBEDDING_ITEM));
        }
    }
    backfill(payload, "model", || Value::from(options.requested_model.as_str()));
    true
}

/// Rewrite a single upstream line (without its line terminator).
///
/// Returns the output line without a terminator, or `None` when the line is
/// dropped. `now` backfills a missing `created`.
pub fn transcode_line(line: &str, options: &TranscodeOptions, now: i64) -> Option<String> {
    if line.is_empty() || line.contains(DONE_SENTINEL) {
        return Some(line.to_string());
    }

    let json_part = line.strip_prefix(DATA_PREFIX).unwrap_or(line);
    let mut payload = match serde_json::from_str::<Value>(json_part) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            let err = ProxyError::MalformedUpstreamLine {
                message: format!("not a JSON object: {}", json_part),
            };
            tracing::warn!("Skipping upstream line: {}", err);
            return None;
        },
        Err(e) => {
            let err = ProxyError::MalformedUpstreamLine { message: format!("{}: {}", e, json_part) };
            tracing::warn!("Skipping upstream line: {}", err);
            return None;
        },
    };

    let keep = match options.kind {
        TranscodeKind::Chat => rewrite_chat(&mut payload, options, now),
        TranscodeKind::Embeddings => rewrite_embeddings(&mut payload, options),
    };
    if !keep {
        tracing::trace!("Dropping upstream line without payload");
        return None;
    }

    let encoded = match serde_json::to_string(&Value::Object(payload)) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("Failed to re-encode upstream line: {}", e);
            return None;
        },
    };

    if options.kind == TranscodeKind::Chat && options.is_streaming {
        Some(format!("{}{}", DATA_PREFIX, encoded))
    } else {
        Some(encoded)
    }
}

fn emit(raw: &[u8], options: &TranscodeOptions) -> Option<Bytes> {
    let Ok(text) = std::str::from_utf8(raw) else {
        tracing::warn!("Skipping upstream line with invalid UTF-8 ({} bytes)", raw.len());
        return None;
    };
    let line = text.strip_suffix('\r').unwrap_or(text);
    transcode_line(line, options, chrono::Utc::now().timestamp()).map(|mut out| {
        out.push('\n');
        Bytes::from(out)
    })
}

/// Rewrite an upstream byte stream into caller-facing lines.
///
/// A read error from upstream, or a line longer than [`MAX_LINE_BYTES`], ends
/// the stream with an `Err` wrapping [`ProxyError::UpstreamStream`]. That aborts
/// the HTTP response instead of completing it as a success. Dropping the
/// returned stream drops the upstream body with it.
pub fn transcode<S, E>(
    upstream: S,
    options: TranscodeOptions,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut buffer = BytesMut::new();

        while let Some(item) = upstream.next().await {
            match item {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_raw = buffer.split_to(pos + 1);
                        if let Some(out) = emit(&line_raw[..pos], &options) {
                            yield Ok::<Bytes, std::io::Error>(out);
                        }
                    }
                    if buffer.len() > MAX_LINE_BYTES {
                        let err = ProxyError::UpstreamStream {
                            message: format!("line exceeds {} bytes without a terminator", MAX_LINE_BYTES),
                        };
                        tracing::error!("{}", err);
                        yield Err(std::io::Error::other(err));
                        return;
                    }
                },
                Err(e) => {
                    let err = ProxyError::UpstreamStream { message: e.to_string() };
                    tracing::error!("Upstream failed mid-transfer: {}", err);
                    yield Err(std::io::Error::other(err));
                    return;
                },
            }
        }

        if !buffer.is_empty() {
            if let Some(out) = emit(&buffer, &options) {
                yield Ok(out);
            }
        }
    }
}
