use rand::{rngs::OsRng, Rng, RngCore};

/// Characters an IV may be drawn from. Every one of them is URL-safe.
pub const IV_CHARSET: &[u8] = b"1234567890ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const IV_LEN: usize = 16;

/// Draws an alphanumeric IV from the OS CSPRNG.
/// The characters themselves are the IV bytes fed to the cipher.
pub fn random_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    for slot in iv.iter_mut() {
        *slot = IV_CHARSET[OsRng.gen_range(0..IV_CHARSET.len())];
    }
    iv
}

/// Returns `2 * bytes` uppercase hexadecimal characters.
pub fn random_hex_upper(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode_upper(buf)
}
