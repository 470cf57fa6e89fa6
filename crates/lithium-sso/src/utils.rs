pub mod crypto;
pub mod random;

pub use crypto::{AesCbcProvider, CompressionFormat};
