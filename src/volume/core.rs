//! Volume implementation
//!
//! A volume is a cheap, cloneable handle over the store and the current
//! directory context. Every open file holds a clone; closing the volume
//! empties the store slot, which every later operation observes.

use log::{debug, info};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::config::VolumeConfig;
use crate::entry::{self, FileKind, FileMode, Header};
use crate::error::{Error, Result, StoreError};
use crate::file::{Access, File, OpenFlags};
use crate::store::{RedbStore, Store};
use crate::volume::path;

struct Shared {
    store: RwLock<Option<Box<dyn Store>>>,
    cwd: RwLock<String>,
}

#[derive(Clone)]
pub struct Volume {
    shared: Arc<Shared>,
}

impl Volume {
    /// Open (or create) a volume backed by the database file at `path`.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = RedbStore::open(path)?;
        Ok(Self::with_store(store))
    }

    /// Open the volume described by `config`, starting in its initial directory.
    pub fn from_config(config: &VolumeConfig) -> Result<Self> {
        let volume = Self::open_path(config.db_path())?;
        volume.enter_initial_dir(&config.initial_dir)?;
        Ok(volume)
    }

    /// Set the starting context. A stored entry must be a directory; a missing
    /// one is taken as given so a fresh database can start below the root.
    fn enter_initial_dir(&self, dir: &str) -> Result<()> {
        if dir.is_empty() {
            return Ok(());
        }
        match self.fetch(dir)? {
            Some((header, _)) if !header.is_dir() => Err(Error::NotDirectory {
                op: "initial_dir",
                path: dir.to_string(),
            }),
            _ => {
                *self.cwd_mut()? = dir.to_string();
                Ok(())
            }
        }
    }

    pub fn with_store<S: Store + 'static>(store: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: RwLock::new(Some(Box::new(store))),
                cwd: RwLock::new(String::new()),
            }),
        }
    }

    /// Open `path` with the given flags.
    ///
    /// A stored entry seeds the file's header and buffer. A missing path
    /// yields an empty file with a fresh header built from `mode`; nothing is
    /// written until the file is synced or closed.
    pub fn open(&self, path: &str, flags: OpenFlags, mode: FileMode) -> Result<File> {
        let key = self.resolve(path)?;
        let access = Access::from_flags(flags);

        let (header, content) = match self.fetch(&key)? {
            Some((mut header, content)) => {
                header.name = key.clone();
                if flags.contains(OpenFlags::TRUNC) && access.writable() {
                    header.size = 0;
                    (header, Vec::new())
                } else {
                    (header, content)
                }
            }
            None => (Header::new(key.clone(), mode), Vec::new()),
        };

        debug!("Opened {} ({} bytes, flags {:?})", key, header.size, flags);
        Ok(File::new(self.clone(), header, content, access))
    }

    /// Change the current directory context to `path`, which must name a
    /// stored directory.
    pub fn chdir(&self, path: &str) -> Result<()> {
        let key = self.resolve(path)?;
        self.chdir_key(key)
    }

    /// Change directory to an already resolved key.
    pub(crate) fn chdir_key(&self, key: String) -> Result<()> {
        let header = self.stat_key("chdir", &key)?;
        match header.kind() {
            FileKind::Directory => {
                debug!("Changed directory to {}", key);
                *self.cwd_mut()? = key;
                Ok(())
            }
            FileKind::Regular => Err(Error::NotDirectory {
                op: "chdir",
                path: key,
            }),
        }
    }

    /// Current directory context
    pub fn getwd(&self) -> Result<String> {
        self.ensure_open()?;
        let cwd = self.shared.cwd.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cwd.clone())
    }

    /// Header of the entry stored under `path`.
    pub fn stat(&self, path: &str) -> Result<Header> {
        let key = self.resolve(path)?;
        self.stat_key("stat", &key)
    }

    /// Delete the entry stored under `path`. Open files keep their buffers
    /// and recreate the entry if they sync again.
    pub fn remove(&self, path: &str) -> Result<()> {
        let key = self.resolve(path)?;
        if self.with_slot(|store| store.delete(&key))? {
            debug!("Removed {}", key);
            Ok(())
        } else {
            Err(Error::NotFound {
                op: "remove",
                path: key,
            })
        }
    }

    /// Commit a file's header and buffer under its key.
    ///
    /// The header size is recomputed from the buffer first. This is the only
    /// place entries are written; the latest commit to a key wins.
    pub(crate) fn write_file(&self, header: &mut Header, content: &[u8]) -> Result<()> {
        header.size = if header.is_dir() {
            0
        } else {
            content.len() as u64
        };

        let bytes = entry::encode(header, content).map_err(|source| Error::Encode {
            path: header.name.clone(),
            source,
        })?;
        self.with_slot(|store| store.put(&header.name, &bytes))?;

        debug!("Committed {} ({} bytes)", header.name, header.size);
        Ok(())
    }

    /// Release the store. Every later call on this volume or its files fails.
    pub fn close(&self) -> Result<()> {
        let mut slot = self.shared.store.write().map_err(|_| StoreError::Poisoned)?;
        match slot.take() {
            Some(store) => {
                drop(store);
                info!("Volume closed");
                Ok(())
            }
            None => Err(StoreError::Closed.into()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared
            .store
            .read()
            .map(|slot| slot.is_none())
            .unwrap_or(true)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(StoreError::Closed.into());
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<String> {
        let cwd = self.getwd()?;
        path::resolve(&cwd, name)
    }

    fn stat_key(&self, op: &'static str, key: &str) -> Result<Header> {
        match self.fetch(key)? {
            Some((mut header, _)) => {
                header.name = key.to_string();
                Ok(header)
            }
            None => Err(Error::NotFound {
                op,
                path: key.to_string(),
            }),
        }
    }

    fn fetch(&self, key: &str) -> Result<Option<(Header, Vec<u8>)>> {
        let Some(bytes) = self.with_slot(|store| store.get(key))? else {
            return Ok(None);
        };
        let entry = entry::decode(&bytes).map_err(|source| Error::CorruptEntry {
            path: key.to_string(),
            source,
        })?;
        Ok(Some(entry))
    }

    fn with_slot<T>(
        &self,
        f: impl FnOnce(&dyn Store) -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        let slot = self.shared.store.read().map_err(|_| StoreError::Poisoned)?;
        let store = slot.as_deref().ok_or(StoreError::Closed)?;
        Ok(f(store)?)
    }

    fn cwd_mut(&self) -> Result<std::sync::RwLockWriteGuard<'_, String>> {
        self.shared
            .cwd
            .write()
            .map_err(|_| StoreError::Poisoned.into())
    }
}

impl fmt::Debug for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cwd = self.shared.cwd.read().map(|cwd| cwd.clone()).unwrap_or_default();
        f.debug_struct("Volume")
            .field("cwd", &cwd)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn volume() -> Volume {
        Volume::with_store(MemoryStore::new())
    }

    #[test]
    fn open_missing_path_does_not_write() {
        let volume = volume();
        let file = volume
            .open("new.txt", OpenFlags::WRONLY, FileMode::regular(0o600))
            .unwrap();
        assert_eq!(file.stat().mode.perm(), 0o600);
        assert!(matches!(
            volume.stat("new.txt"),
            Err(Error::NotFound { op: "stat", .. })
        ));
    }

    #[test]
    fn chdir_to_missing_path_fails() {
        let volume = volume();
        assert!(matches!(
            volume.chdir("nowhere"),
            Err(Error::NotFound { op: "chdir", .. })
        ));
        assert_eq!(volume.getwd().unwrap(), "");
    }

    #[test]
    fn corrupt_entry_is_reported() {
        let store = MemoryStore::new();
        store.put("bad", &[entry::codec::ENTRY_VERSION, 0xc1]).unwrap();
        let volume = Volume::with_store(store);

        assert!(matches!(
            volume.open("bad", OpenFlags::RDONLY, FileMode::regular(0o644)),
            Err(Error::CorruptEntry { .. })
        ));
    }

    #[test]
    fn remove_deletes_entry() {
        let volume = volume();
        let mut file = volume
            .open("gone", OpenFlags::WRONLY, FileMode::regular(0o644))
            .unwrap();
        file.write(b"x").unwrap();
        file.close().unwrap();

        volume.remove("gone").unwrap();
        assert!(matches!(
            volume.remove("gone"),
            Err(Error::NotFound { op: "remove", .. })
        ));
    }

    #[test]
    fn close_twice_fails() {
        let volume = volume();
        volume.close().unwrap();
        assert!(volume.is_closed());
        assert!(volume.close().unwrap_err().is_volume_closed());
        assert!(
            volume
                .open("a", OpenFlags::RDONLY, FileMode::regular(0o644))
                .unwrap_err()
                .is_volume_closed()
        );
    }
}
