// tests/cli_tests.rs
mod common;

use std::fs;
use std::process::{Command, Output};

use common::{b64, collection_key, read_decrypted, KeyringFixture, IV1, IV2, K1, K2};

fn rekey(fx: &KeyringFixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rekey"))
        .args(args)
        .current_dir(fx.root())
        .env_remove("REKEY_CONFIG")
        .env_remove("REKEY_KEY")
        .env_remove("REKEY_IV")
        .env_remove("REKEY_NEW_KEY")
        .env_remove("REKEY_NEW_IV")
        .env_remove("REKEY_ROOT")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn test_cli_rekeys_and_exits_zero() {
    let fx = KeyringFixture::new();
    fx.add_key("abc123", &collection_key(3));
    let root = fx.root().display().to_string();

    let out = rekey(
        &fx,
        &[
            "-k", &b64(&K1), "-i", &b64(&IV1),
            "--new-key", &b64(&K2), "--new-iv", &b64(&IV2),
            "-z", &root,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Rekeyed 1 collection key(s)"), "{stdout}");
    assert_eq!(
        read_decrypted(&fx.keyring().join("abc123.txt"), &K2, IV2),
        collection_key(3)
    );
}

#[test]
fn test_cli_short_aliases_for_new_key_and_iv() {
    let fx = KeyringFixture::new();
    fx.add_key("abc123", &collection_key(4));
    let root = fx.root().display().to_string();

    let out = rekey(
        &fx,
        &[
            "--key", &b64(&K1), "--iv", &b64(&IV1),
            "--k2", &b64(&K2), "--i2", &b64(&IV2),
            "--root", &root,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn test_cli_bad_key_exits_non_zero_without_touching_keyring() {
    let fx = KeyringFixture::new();
    let original = fx.add_key("abc123", &collection_key(5));
    let before = fs::read(&original).unwrap();
    let root = fx.root().display().to_string();

    let out = rekey(
        &fx,
        &[
            "-k", "not base64!", "-i", &b64(&IV1),
            "--new-key", &b64(&K2), "--new-iv", &b64(&IV2),
            "-z", &root,
        ],
    );

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("secret key"), "{stderr}");
    assert_eq!(fs::read(&original).unwrap(), before);
    assert_eq!(fx.backups(), (vec![], vec![]));
}

#[test]
fn test_cli_unknown_settings_key_is_rejected() {
    let fx = KeyringFixture::new();
    let settings = fx.root().join("custom.toml");
    fs::write(&settings, "[layout]\nnot_a_field = 1\n").unwrap();
    let root = fx.root().display().to_string();
    let settings = settings.display().to_string();

    let out = rekey(
        &fx,
        &[
            "-k", &b64(&K1), "-i", &b64(&IV1),
            "--new-key", &b64(&K2), "--new-iv", &b64(&IV2),
            "-z", &root, "--config", &settings,
        ],
    );

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to load settings"));
}
