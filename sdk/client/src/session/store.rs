use {
  crate::Error,
  dashmap::DashMap,
  serde::{de::DeserializeOwned, Serialize},
  std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
  },
  tracing::warn,
};

/// Key-value storage that wallet backends persist their sessions in,
/// so a session survives restarts of the application.
pub trait SessionStore: Send + Sync {
  fn load(&self, key: &str) -> Result<Option<String>, Error>;
  fn save(&self, key: &str, value: &str) -> Result<(), Error>;
  fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Typed helpers on top of the raw string store.
pub trait SessionStoreExt: SessionStore {
  /// A stored value that no longer deserializes is discarded and
  /// reported as absent, so a damaged session never blocks startup.
  fn load_json<T: DeserializeOwned>(
    &self,
    key: &str,
  ) -> Result<Option<T>, Error> {
    let Some(raw) = self.load(key)? else {
      return Ok(None);
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Ok(Some(value)),
      Err(e) => {
        warn!("discarding unreadable stored session {key:?}: {e}");
        self.remove(key)?;
        Ok(None)
      }
    }
  }

  fn save_json<T: Serialize>(
    &self,
    key: &str,
    value: &T,
  ) -> Result<(), Error> {
    self.save(key, &serde_json::to_string_pretty(value)?)
  }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

/// Ephemeral store, sessions are gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
  entries: DashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
  fn load(&self, key: &str) -> Result<Option<String>, Error> {
    Ok(self.entries.get(key).map(|v| v.value().clone()))
  }

  fn save(&self, key: &str, value: &str) -> Result<(), Error> {
    self.entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), Error> {
    self.entries.remove(key);
    Ok(())
  }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
  dir: PathBuf,
}

impl FileSessionStore {
  pub fn new(dir: impl AsRef<Path>) -> Result<Self, Error> {
    let dir = dir.as_ref().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(Self { dir })
  }

  fn path(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{key}.json"))
  }
}

impl SessionStore for FileSessionStore {
  fn load(&self, key: &str) -> Result<Option<String>, Error> {
    match fs::read_to_string(self.path(key)) {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn save(&self, key: &str, value: &str) -> Result<(), Error> {
    Ok(fs::write(self.path(key), value)?)
  }

  fn remove(&self, key: &str) -> Result<(), Error> {
    match fs::remove_file(self.path(key)) {
      Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
      _ => Ok(()),
    }
  }
}
