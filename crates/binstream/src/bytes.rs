//! Stateless helpers over byte slices: padding/terminator trimming, the
//! byte-transform primitives format definitions apply to raw fields (XOR,
//! rotate, zlib inflate), text decoding, and the small numeric helpers the
//! expression layer of generated parsers leans on.

use core::cmp::Ordering;

use bstr::ByteSlice;

use crate::error::{ErrorKind, ParseError};

/// Removes the maximal run of `pad` bytes from the end of `data`.
#[must_use]
pub fn strip_trailing(data: &[u8], pad: u8) -> &[u8] {
    let mut end = data.len();
    while end > 0 && data[end - 1] == pad {
        end -= 1;
    }
    &data[..end]
}

/// Returns the prefix of `data` up to the first `term` byte, optionally
/// including the terminator itself; the whole slice if `term` is absent.
#[must_use]
pub fn truncate_at_terminator(data: &[u8], term: u8, include_term: bool) -> &[u8] {
    match data.find_byte(term) {
        Some(i) => &data[..i + usize::from(include_term)],
        None => data,
    }
}

/// Decodes `bytes` using the character encoding named by `label`.
///
/// All-ASCII input under an ASCII label is decoded locally; every other
/// label resolves through the WHATWG encoding registry and decodes with
/// replacement semantics.
///
/// # Errors
///
/// [`ErrorKind::UnknownEncoding`] if the registry does not recognize
/// `label`.
pub fn decode_text(bytes: &[u8], label: &str) -> Result<String, ParseError> {
    if label.eq_ignore_ascii_case("ascii") && bytes.is_ascii() {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        ParseError::new(ErrorKind::UnknownEncoding {
            label: label.to_string(),
        })
    })?;
    let (text, _) = encoding.decode_with_bom_removal(bytes);
    Ok(text.into_owned())
}

/// XORs every byte with `key`. Applying the same key twice restores the
/// input.
#[must_use]
pub fn xor_with_byte(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// XORs each byte with the corresponding byte of a cyclically repeated key
/// sequence. An empty key is the identity.
#[must_use]
pub fn xor_with_sequence(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter().zip(key.iter().cycle()).map(|(b, k)| b ^ k).collect()
}

/// Rotates every byte left by `amount` bits within its own 8-bit lane.
/// Amounts wrap modulo 8.
///
/// # Errors
///
/// [`ErrorKind::UnsupportedGroupSize`] for any `group_size` other than 1.
pub fn rotate_left(data: &[u8], amount: u32, group_size: usize) -> Result<Vec<u8>, ParseError> {
    if group_size != 1 {
        return Err(ParseError::new(ErrorKind::UnsupportedGroupSize { group_size }));
    }
    Ok(data.iter().map(|b| b.rotate_left(amount)).collect())
}

/// Decompresses a zlib-framed buffer.
///
/// # Errors
///
/// [`ErrorKind::DecompressionFailed`] carrying the inflate primitive's
/// status text.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, ParseError> {
    miniz_oxide::inflate::decompress_to_vec_zlib(data).map_err(|e| {
        ParseError::new(ErrorKind::DecompressionFailed {
            reason: e.to_string(),
        })
    })
}

/// Mathematical modulo: the result is always in `[0, b)`.
///
/// # Errors
///
/// [`ErrorKind::InvalidDivisor`] for `b <= 0`.
pub fn positive_modulo(a: i64, b: i64) -> Result<i64, ParseError> {
    if b <= 0 {
        return Err(ParseError::new(ErrorKind::InvalidDivisor { divisor: b }));
    }
    Ok(a.rem_euclid(b))
}

/// Smallest element of `seq`, or `None` when empty.
#[must_use]
pub fn min_of<T: PartialOrd + Copy>(seq: &[T]) -> Option<T> {
    seq.iter().copied().reduce(|min, x| if x < min { x } else { min })
}

/// Largest element of `seq`, or `None` when empty.
#[must_use]
pub fn max_of<T: PartialOrd + Copy>(seq: &[T]) -> Option<T> {
    seq.iter().copied().reduce(|max, x| if x > max { x } else { max })
}

/// Lexicographic comparison, element by element and then by length.
#[must_use]
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}
