// tests/common/mod.rs
//! Shared test utilities — logging setup and keyring fixtures

#![allow(dead_code)] // each test binary uses a different subset

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use keyring_rekey::crypto::{decrypt_to_vec, encrypt_to_vec};
use keyring_rekey::{InitVector, MasterKey, RekeyInputs};
use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const K1: [u8; 16] = [
    0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f, 0x3c,
];
pub const IV1: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];
pub const K2: [u8; 32] = [0x5a; 32];
pub const IV2: [u8; 16] = [0xa5; 16];

/// Initialize test-friendly logging; respects RUST_LOG, safe to call repeatedly
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

pub fn b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn master_key(bytes: &[u8]) -> MasterKey {
    MasterKey::new(bytes.to_vec())
}

pub fn init_vector(bytes: [u8; 16]) -> InitVector {
    InitVector::new(bytes)
}

/// Deterministic 16-byte collection key for `seed`
pub fn collection_key(seed: u8) -> Vec<u8> {
    (0..16u8).map(|i| seed.wrapping_mul(31).wrapping_add(i)).collect()
}

/// A temporary root dir holding an (initially empty) `keyring/`
pub struct KeyringFixture {
    pub tmp: TempDir,
}

impl KeyringFixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("keyring")).unwrap();
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn keyring(&self) -> PathBuf {
        self.root().join("keyring")
    }

    /// Write `<id>.txt` holding `material` encrypted under K1/IV1
    pub fn add_key(&self, id: &str, material: &[u8]) -> PathBuf {
        let path = self.keyring().join(format!("{id}.txt"));
        write_encrypted(&path, material, &K1, IV1);
        path
    }

    pub fn add_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.keyring().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    /// Inputs rekeying K1/IV1 → K2/IV2
    pub fn inputs(&self) -> RekeyInputs {
        RekeyInputs::new(b64(&K1), b64(&IV1), b64(&K2), b64(&IV2), self.root())
    }

    /// Backup dirs and archives currently present in the root
    pub fn backups(&self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut dirs = Vec::new();
        let mut archives = Vec::new();
        for entry in fs::read_dir(self.root()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if !name.starts_with("keyring-backup-") {
                continue;
            }
            if name.ends_with(".tar.gz") {
                archives.push(path);
            } else {
                dirs.push(path);
            }
        }
        (dirs, archives)
    }

    pub fn keyring_file_names(&self) -> Vec<String> {
        file_names(&self.keyring())
    }
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn write_encrypted(path: &Path, material: &[u8], key: &[u8], iv: [u8; 16]) {
    let ciphertext = encrypt_to_vec(material, &master_key(key), &init_vector(iv)).unwrap();
    fs::write(path, ciphertext.expose_secret()).unwrap();
}

pub fn read_decrypted(path: &Path, key: &[u8], iv: [u8; 16]) -> Vec<u8> {
    let ciphertext = fs::read(path).unwrap();
    decrypt_to_vec(&ciphertext, &master_key(key), &init_vector(iv))
        .unwrap()
        .expose_secret()
        .clone()
}

/// Every entry of a tar.gz, keyed by entry path
pub fn read_tar_gz(archive: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut tar = tar::Archive::new(GzDecoder::new(File::open(archive).unwrap()));
    let mut entries = BTreeMap::new();
    for entry in tar.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        entries.insert(name, data);
    }
    entries
}
