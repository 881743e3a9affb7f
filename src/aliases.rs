// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret containers used throughout keyring-rekey.
//! All of them zeroize their contents on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(InitVector, 16); // AES block-sized CBC initialisation vector

// Dynamic secrets
dynamic_alias!(MasterKey, Vec<u8>); // AES-128/192/256 master key (length checked on decode)
dynamic_alias!(KeyMaterial, Vec<u8>); // Decrypted collection key bytes
dynamic_alias!(CypherText, Vec<u8>);
