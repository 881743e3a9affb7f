// src/rekey.rs
//! The rekey pipeline: backup → decrypt → encrypt → cleanup → verify
//!
//! Steps run strictly in order and each one is a hard gate. Once the live
//! keyring has been moved aside, nothing in this module deletes the backup
//! directory or archive except the cleanup step after a complete re-encrypt,
//! and the archive is never deleted at all.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::codec::{FileKeyDecryptor, FileKeyEncryptor, KeyDecryptor, KeyEncryptor};
use crate::config::Settings;
use crate::context::{ConfigResolver, ContextResolver, OperationContext, RekeyInputs};
use crate::error::{RekeyError, Result};
use crate::files::{FileArchiver, FileFilter, FilesHelper, KeyFileFilter, LocalFiles, TarGzArchiver};

/// How far a run got. Used to tailor rollback instructions on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Keyring untouched.
    Active,
    /// Keyring renamed to the backup dir.
    Moved,
    /// Backup archive written.
    Archived,
    /// Fresh empty keyring created.
    BackedUp,
    /// All keys decrypted into memory.
    Decrypted,
    /// All keys written under the new master key.
    Encrypted,
    /// Backup dir removed.
    Rekeyed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Active => "active",
            Phase::Moved => "moved",
            Phase::Archived => "archived",
            Phase::BackedUp => "backed up",
            Phase::Decrypted => "decrypted",
            Phase::Encrypted => "encrypted",
            Phase::Rekeyed => "rekeyed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RekeyReport {
    pub rekeyed: usize,
    pub archived: usize,
    pub keyring_dir: PathBuf,
    pub backup_archive: PathBuf,
    /// Entries of the old keyring that were not key files. They are neither
    /// archived nor rekeyed, and were deleted with the backup dir.
    pub discarded: Vec<String>,
}

/// Re-encrypts every collection key under a new master key/IV.
pub struct RekeyCommand {
    resolver: Box<dyn ConfigResolver>,
    files: Box<dyn FilesHelper>,
    archiver: Box<dyn FileArchiver>,
    decryptor: Box<dyn KeyDecryptor>,
    encryptor: Box<dyn KeyEncryptor>,
    filter: KeyFileFilter,
}

impl RekeyCommand {
    pub fn new(
        resolver: Box<dyn ConfigResolver>,
        files: Box<dyn FilesHelper>,
        archiver: Box<dyn FileArchiver>,
        decryptor: Box<dyn KeyDecryptor>,
        encryptor: Box<dyn KeyEncryptor>,
        filter: KeyFileFilter,
    ) -> Self {
        Self {
            resolver,
            files,
            archiver,
            decryptor,
            encryptor,
            filter,
        }
    }

    /// Production wiring: local filesystem, tar.gz backups, AES-CBC codec.
    pub fn from_settings(settings: &Settings) -> Self {
        let filter = KeyFileFilter::new(settings.layout.key_extension.clone());
        Self::new(
            Box::new(ContextResolver::new(settings.layout.clone())),
            Box::new(LocalFiles),
            Box::new(TarGzArchiver::default()),
            Box::new(FileKeyDecryptor::new(filter.clone())),
            Box::new(FileKeyEncryptor::new(filter.clone())),
            filter,
        )
    }

    pub fn run(&self, inputs: &RekeyInputs) -> Result<RekeyReport> {
        let ctx = self.resolver.resolve(inputs)?;
        info!("config parsed successfully");

        let mut phase = Phase::Active;
        self.execute(&ctx, &mut phase).inspect_err(|err| {
            if let Some(steps) = rollback_steps(phase, &ctx) {
                error!(%phase, "rekey failed: {err}\n\nTo rollback these changes:\n{steps}");
            }
        })
    }

    fn execute(&self, ctx: &OperationContext, phase: &mut Phase) -> Result<RekeyReport> {
        let archived = self.create_backup(ctx, phase)?;

        let records =
            self.decryptor
                .decrypt_keys(ctx.keyring_backup_dir(), ctx.current_key(), ctx.current_iv())?;
        let expected: Vec<String> = records
            .iter()
            .map(|r| r.collection_id().to_owned())
            .collect();
        *phase = Phase::Decrypted;

        self.encryptor
            .encrypt_keys(records, ctx.keyring_dir(), ctx.new_key(), ctx.new_iv())?;
        *phase = Phase::Encrypted;

        let discarded = self.discarded_entries(ctx.keyring_backup_dir())?;
        // The archive stays behind as the rollback point.
        self.files.delete_dir(ctx.keyring_backup_dir())?;
        *phase = Phase::Rekeyed;

        self.verify_complete(&expected, ctx)?;
        info!(
            archive = %ctx.keyring_backup_archive().display(),
            "rekey completed successfully, a backup of the original keyring dir has been created"
        );

        Ok(RekeyReport {
            rekeyed: expected.len(),
            archived,
            keyring_dir: ctx.keyring_dir().to_path_buf(),
            backup_archive: ctx.keyring_backup_archive().to_path_buf(),
            discarded,
        })
    }

    /// Names of the entries in `dir` that are not key files, each logged at
    /// warn level since deleting `dir` loses them for good.
    fn discarded_entries(&self, dir: &Path) -> Result<Vec<String>> {
        let not_a_key = |path: &Path| !self.filter.matches(path);
        let names: Vec<String> = self
            .files
            .list_files(dir, &not_a_key)?
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        for name in &names {
            warn!(
                entry = %name,
                "not a collection key file, it is not in the backup archive and will be deleted"
            );
        }
        Ok(names)
    }

    fn create_backup(&self, ctx: &OperationContext, phase: &mut Phase) -> Result<usize> {
        info!(
            from = %ctx.keyring_dir().display(),
            to = %ctx.keyring_backup_dir().display(),
            "moving keyring dir to backup dir"
        );
        self.files
            .move_dir(ctx.keyring_dir(), ctx.keyring_backup_dir())?;
        *phase = Phase::Moved;

        info!(archive = %ctx.keyring_backup_archive().display(), "creating keyring backup tar.gz");
        let archived = self.archiver.create_tar_gz(
            ctx.keyring_backup_dir(),
            ctx.keyring_backup_archive(),
            &self.filter,
        )?;
        *phase = Phase::Archived;

        info!(dir = %ctx.keyring_dir().display(), "creating new (empty) keyring dir");
        self.files.create_dir(ctx.keyring_dir())?;
        *phase = Phase::BackedUp;

        Ok(archived)
    }

    fn verify_complete(&self, expected: &[String], ctx: &OperationContext) -> Result<()> {
        let missing: Vec<String> = expected
            .iter()
            .filter(|id| {
                let path = ctx.keyring_dir().join(self.filter.file_name(id));
                !self.files.exists(&path)
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(RekeyError::Verification {
                missing,
                archive: ctx.keyring_backup_archive().to_path_buf(),
                backup_dir: ctx.keyring_backup_dir().to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Manual recovery instructions for a run that failed after reaching `phase`.
///
/// `None` when the keyring was never touched.
pub fn rollback_steps(phase: Phase, ctx: &OperationContext) -> Option<String> {
    let keyring = ctx.keyring_dir().display();
    let backup = ctx.keyring_backup_dir().display();
    let archive = ctx.keyring_backup_archive().display();
    let root = ctx.root_dir().display();

    let steps = match phase {
        Phase::Active => return None,
        Phase::Moved | Phase::Archived => format!(
            "\t1) Remove {keyring} if it exists\n\
             \t2) Rename the backup dir {backup} to {keyring}\n\
             \t3) Delete the (possibly partial) archive {archive}"
        ),
        Phase::BackedUp => format!(
            "\t1) Remove the empty keyring dir {keyring}\n\
             \t2) Rename the backup dir {backup} to {keyring}"
        ),
        Phase::Decrypted => format!(
            "\t1) Delete the partially rekeyed dir {keyring}\n\
             \t2) Rename the backup dir {backup} to {keyring}"
        ),
        Phase::Encrypted => format!(
            "\t1) The keyring {keyring} has been fully rekeyed\n\
             \t2) Remove what is left of {backup} manually; {archive} holds the original keys"
        ),
        Phase::Rekeyed => format!(
            "\t1) Delete {keyring}\n\
             \t2) Untar the backup keyring tar.gz inside the root dir: tar -xzf {archive} -C {root}\n\
             \t3) Rename the extracted dir {backup} to {keyring}"
        ),
    };
    Some(steps)
}
