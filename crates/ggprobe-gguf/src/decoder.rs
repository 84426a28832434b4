//! GGUF prefix decoder.
//!
//! Walks the tagged key/value metadata section of a GGUF stream, extracts
//! the attention hyperparameters, and skips everything else by tag.
//! Scanning stops as soon as the required fields are known, which keeps a
//! remote decode to the first few tens of kilobytes of a multi-gigabyte
//! file in the common case.

use async_trait::async_trait;
use ggprobe_core::{
    ByteSource, GgufDecodeError, HyperparameterDecoderPort, ModelHyperparameters,
};

use crate::format::{GGUF_MAGIC, GGUF_VERSION_MAX, GgufValueType, MAX_METADATA_KEY_LEN};
use crate::reader::PrefixReader;

// Metadata key suffixes carrying the hyperparameters. Keys follow the
// `<arch>.<field>` convention; only the suffix is matched so the decoder
// stays architecture-agnostic.
const KEY_HEAD_COUNT: &str = "attention.head_count";
const KEY_HEAD_COUNT_KV: &str = "attention.head_count_kv";
const KEY_BLOCK_COUNT: &str = "block_count";
const KEY_EMBEDDING_LENGTH: &str = "embedding_length";

/// The canonical hyperparameter decoder.
///
/// One implementation serves every consumer; local files and network
/// streams come in through the same [`ByteSource`] seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct GgufPrefixDecoder;

impl GgufPrefixDecoder {
    /// Create a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HyperparameterDecoderPort for GgufPrefixDecoder {
    async fn decode(
        &self,
        source: &mut dyn ByteSource,
    ) -> Result<Option<ModelHyperparameters>, GgufDecodeError> {
        decode_prefix(source).await
    }
}

/// Decode hyperparameters from the metadata prefix of `source`.
///
/// `Ok(None)` covers every "not a decodable model" outcome: wrong magic,
/// a version above [`GGUF_VERSION_MAX`], or required keys missing after
/// the full scan. Corrupt or truncated streams are errors instead.
#[allow(clippy::cast_possible_truncation)]
pub async fn decode_prefix<S: ByteSource + ?Sized>(
    source: &mut S,
) -> Result<Option<ModelHyperparameters>, GgufDecodeError> {
    let mut reader = PrefixReader::new(source);

    let mut magic = [0u8; 4];
    reader.read_bytes(&mut magic).await?;
    if magic != GGUF_MAGIC {
        tracing::debug!("magic mismatch, not a GGUF stream");
        return Ok(None);
    }

    let version = reader.read_u32().await?;
    if version > GGUF_VERSION_MAX {
        tracing::debug!(version, "unsupported GGUF version");
        return Ok(None);
    }
    if version >= 1 {
        reader.skip_bytes(8).await?;
    }

    let entry_count = reader.read_u64().await?;

    let mut hidden_size: Option<u64> = None;
    let mut attention_heads: Option<u32> = None;
    let mut hidden_layers: Option<u32> = None;
    let mut kv_heads: Option<u32> = None;
    let mut kv_heads_explicit = false;

    for _ in 0..entry_count {
        let key_len = reader.read_u64().await?;
        if key_len > MAX_METADATA_KEY_LEN {
            return Err(GgufDecodeError::CorruptStream(format!(
                "metadata key length {key_len} exceeds sanity bound at byte {}",
                reader.position()
            )));
        }
        let key = reader.read_utf8(key_len as usize).await?;

        let raw_tag = reader.read_u32().await?;
        let Some(tag) = GgufValueType::from_raw(raw_tag) else {
            return Err(GgufDecodeError::CorruptStream(format!(
                "unknown value-type tag {raw_tag} for key '{key}'"
            )));
        };

        if key.ends_with(KEY_HEAD_COUNT_KV) {
            if tag.is_int32() {
                kv_heads = Some(reader.read_u32().await?);
                kv_heads_explicit = true;
            } else {
                skip_value(&mut reader, tag).await?;
            }
        } else if key.ends_with(KEY_HEAD_COUNT) {
            if tag.is_int32() {
                let heads = reader.read_u32().await?;
                attention_heads = Some(heads);
                if !kv_heads_explicit {
                    kv_heads = Some(heads);
                }
            } else {
                skip_value(&mut reader, tag).await?;
            }
        } else if key.ends_with(KEY_BLOCK_COUNT) {
            if tag.is_int32() {
                hidden_layers = Some(reader.read_u32().await?);
            } else {
                skip_value(&mut reader, tag).await?;
            }
        } else if key.ends_with(KEY_EMBEDDING_LENGTH) {
            if tag.is_int32() {
                hidden_size = Some(u64::from(reader.read_u32().await?));
            } else if tag.is_int64() {
                hidden_size = Some(reader.read_u64().await?);
            } else {
                skip_value(&mut reader, tag).await?;
            }
        } else {
            skip_value(&mut reader, tag).await?;
        }

        // The remaining entries are irrelevant once the required fields are
        // known.
        if attention_heads.is_some() && hidden_layers.is_some() && hidden_size.is_some() {
            break;
        }
    }

    match (hidden_size, attention_heads, hidden_layers) {
        (Some(hidden_size), Some(attention_heads), Some(hidden_layers)) => {
            Ok(Some(ModelHyperparameters {
                hidden_size,
                attention_heads,
                kv_heads: kv_heads.unwrap_or(attention_heads),
                hidden_layers,
            }))
        }
        _ => {
            tracing::debug!("required hyperparameter keys missing from metadata");
            Ok(None)
        }
    }
}

/// Skip one value of the given tag without interpreting it.
///
/// Array skipping is recursive in shape; the recursion is flattened into an
/// explicit stack of (tag, remaining-elements) frames keyed purely on the
/// tag, so unknown keys holding nested arrays cannot grow the call stack.
async fn skip_value<S: ByteSource + ?Sized>(
    reader: &mut PrefixReader<'_, S>,
    tag: GgufValueType,
) -> Result<(), GgufDecodeError> {
    let mut pending: Vec<(GgufValueType, u64)> = vec![(tag, 1)];

    while let Some((tag, count)) = pending.pop() {
        if count == 0 {
            continue;
        }
        if let Some(width) = tag.fixed_width() {
            let bytes = width.checked_mul(count).ok_or_else(|| {
                GgufDecodeError::CorruptStream(format!(
                    "array of {count} elements overflows the byte count"
                ))
            })?;
            reader.skip_bytes(bytes).await?;
        } else if tag == GgufValueType::String {
            // One length-prefixed string at a time.
            pending.push((GgufValueType::String, count - 1));
            let len = reader.read_u64().await?;
            reader.skip_bytes(len).await?;
        } else {
            // Array: its elements are consumed before the remaining arrays
            // of this frame.
            pending.push((GgufValueType::Array, count - 1));
            let raw_elem = reader.read_u32().await?;
            let elem = GgufValueType::from_raw(raw_elem).ok_or_else(|| {
                GgufDecodeError::CorruptStream(format!("unknown array element tag {raw_elem}"))
            })?;
            let elements = reader.read_u64().await?;
            pending.push((elem, elements));
        }
    }

    Ok(())
}
