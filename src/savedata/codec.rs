//! Portable save-data blobs.
//!
//! A blob is standard base64 over a sequence of length-prefixed strings,
//! `<len>:<bytes>,`, read pairwise as key then value. Because every field
//! carries its own length, a bio may contain `:`, `,`, newlines or NUL bytes
//! without confusing the decoder. Unknown keys are skipped.

use base64ct::{Base64, Encoding};
use thiserror::Error;

const BIO: &[u8] = b"bio";
const SCORE: &[u8] = b"score";

/// Longest length prefix accepted (covers any `usize`).
const MAX_LEN_DIGITS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub bio: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("missing field")]
    MissingField,
    #[error("bad score")]
    BadScore,
    #[error("malformed save data: {0}")]
    Malformed(&'static str),
}

pub fn encode(data: &SaveData) -> String {
    let score = data.score.to_string();
    let mut payload = Vec::with_capacity(data.bio.len() + score.len() + 24);
    push_field(&mut payload, BIO, data.bio.as_bytes());
    push_field(&mut payload, SCORE, score.as_bytes());
    Base64::encode_string(&payload)
}

pub fn decode(blob: &str) -> Result<SaveData, CodecError> {
    let payload =
        Base64::decode_vec(blob.trim()).map_err(|_| CodecError::Malformed("not base64"))?;

    let mut bio = None;
    let mut score = None;
    let mut rest = payload.as_slice();
    while !rest.is_empty() {
        let (key, tail) = take_chunk(rest)?;
        let (value, tail) = take_chunk(tail)?;
        rest = tail;

        let slot = match key {
            BIO => &mut bio,
            SCORE => &mut score,
            _ => continue,
        };
        if slot.replace(value).is_some() {
            return Err(CodecError::Malformed("duplicate field"));
        }
    }

    let (bio, score) = match (bio, score) {
        (Some(bio), Some(score)) => (bio, score),
        _ => return Err(CodecError::MissingField),
    };

    let score = std::str::from_utf8(score)
        .ok()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(CodecError::BadScore)?;
    let bio = String::from_utf8(bio.to_vec()).map_err(|_| CodecError::Malformed("bio is not utf-8"))?;

    Ok(SaveData { bio, score })
}

fn push_field(out: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    push_chunk(out, key);
    push_chunk(out, value);
}

fn push_chunk(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
    out.push(b',');
}

fn take_chunk(input: &[u8]) -> Result<(&[u8], &[u8]), CodecError> {
    let colon = input
        .iter()
        .take(MAX_LEN_DIGITS + 1)
        .position(|&b| b == b':')
        .ok_or(CodecError::Malformed("missing length prefix"))?;
    let digits = &input[..colon];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::Malformed("bad length prefix"));
    }
    let len: usize = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(CodecError::Malformed("bad length prefix"))?;

    let body = &input[colon + 1..];
    if body.len() <= len || body[len] != b',' {
        return Err(CodecError::Malformed("truncated field"));
    }
    Ok((&body[..len], &body[len + 1..]))
}
