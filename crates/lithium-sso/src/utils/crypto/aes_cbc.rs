use aes::{Aes128, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// AES-CBC encryption provider
/// Supports both AES-128-CBC and AES-256-CBC, PKCS#7 padded
pub struct AesCbcProvider;

impl AesCbcProvider {
    /// Encrypts plaintext using AES-128-CBC with the given 16-byte key and IV
    /// Returns: ciphertext only, the IV travels separately
    pub fn encrypt_128(plaintext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Vec<u8> {
        Aes128CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    /// Encrypts plaintext using AES-256-CBC with the given 32-byte key and IV
    /// Returns: ciphertext only, the IV travels separately
    pub fn encrypt_256(plaintext: &[u8], key: &[u8; 32], iv: &[u8; 16]) -> Vec<u8> {
        Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }
}
