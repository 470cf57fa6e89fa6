//! Test-only inverse of the token codec. Tokens are never decoded in the
//! library itself; the remote service does that.

#![allow(dead_code)]

use aes::{Aes128, Aes256};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use lithium_sso::{CompressionFormat, SsoKey};
use std::io::Read;

pub const IV_LEN: usize = 16;

/// Splits a token into its IV and ciphertext, checking the framing.
pub fn split_token(token: &str) -> (String, Vec<u8>) {
    let rest = token.strip_prefix("~2").expect("missing ~2 prefix");
    assert!(rest.len() > IV_LEN + 1, "token too short: {}", token);
    let (iv, body) = rest.split_at(IV_LEN);
    let body = body.strip_prefix('~').expect("missing IV separator");
    let ciphertext = URL_SAFE
        .decode(body.replace('.', "="))
        .expect("body is not url-safe base64");
    (iv.to_string(), ciphertext)
}

pub fn decode_token(token: &str, key: &SsoKey, compression: CompressionFormat) -> String {
    let (iv, ciphertext) = split_token(token);
    let iv: [u8; IV_LEN] = iv.as_bytes().try_into().unwrap();

    let compressed = match key {
        SsoKey::Aes128(k) => cbc::Decryptor::<Aes128>::new(k.into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext),
        SsoKey::Aes256(k) => cbc::Decryptor::<Aes256>::new(k.into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext),
    }
    .expect("bad padding, wrong key?");

    let mut record = String::new();
    match compression {
        CompressionFormat::RawDeflate => DeflateDecoder::new(compressed.as_slice())
            .read_to_string(&mut record)
            .expect("not a raw deflate stream"),
        CompressionFormat::Zlib => ZlibDecoder::new(compressed.as_slice())
            .read_to_string(&mut record)
            .expect("not a zlib stream"),
    };
    record
}

/// Checks `^~2[0-9A-Za-z]{16}~[A-Za-z0-9\-_.]+$`.
pub fn is_well_formed(token: &str) -> bool {
    let Some(rest) = token.strip_prefix("~2") else {
        return false;
    };
    if rest.len() < IV_LEN + 2 || !rest.is_char_boundary(IV_LEN) {
        return false;
    }
    let (iv, tail) = rest.split_at(IV_LEN);
    let Some(body) = tail.strip_prefix('~') else {
        return false;
    };
    iv.chars().all(|c| c.is_ascii_alphanumeric())
        && !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Fields of a decoded record, with the `Li`/`iL` markers checked and removed.
pub fn record_fields(record: &str) -> Vec<String> {
    let inner = record
        .strip_prefix("Li|")
        .and_then(|r| r.strip_suffix("iL"))
        .expect("record markers");
    inner.split('|').map(str::to_string).collect()
}
