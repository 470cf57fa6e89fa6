pub mod aes_cbc;
pub mod deflate;

pub use aes_cbc::AesCbcProvider;
pub use deflate::CompressionFormat;
