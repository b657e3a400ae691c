use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;
#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::{Error, Result};

/// An open sequence store holding an exclusive OS lock.
///
/// Uses `flock` on Unix and `LockFileEx` on Windows. The lock belongs to this
/// handle, so two handles on the same file exclude each other even inside one
/// process. Dropping the guard unlocks and closes the file on every exit path,
/// including early returns through `?`.
pub(crate) struct StoreLock<'a> {
    file: File,
    path: &'a Path,
}

impl<'a> StoreLock<'a> {
    /// Opens (creating if absent) `path` and polls for the exclusive lock
    /// until `timeout` has elapsed, sleeping `retry` between attempts.
    pub(crate) fn acquire(path: &'a Path, timeout: Duration, retry: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| store_error(path, source))?;

        let start = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    if attempts > 0 {
                        debug!(
                            path = %path.display(),
                            attempts,
                            waited = ?start.elapsed(),
                            "acquired contended sequence store lock"
                        );
                    }
                    return Ok(Self { file, path });
                }
                Err(e) if is_contended(&e) => {}
                Err(source) => return Err(store_error(path, source)),
            }

            attempts += 1;
            let waited = start.elapsed();
            if waited >= timeout {
                #[cfg(feature = "tracing")]
                warn!(
                    path = %path.display(),
                    attempts,
                    ?waited,
                    "gave up waiting for sequence store lock"
                );
                return Err(Error::LockTimeout {
                    path: path.to_path_buf(),
                    waited,
                });
            }
            thread::sleep(retry);
        }
    }

    /// Reads the whole store from the start.
    pub(crate) fn read_contents(&mut self) -> Result<String> {
        let mut content = String::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_string(&mut content))
            .map_err(|source| store_error(self.path, source))?;
        Ok(content)
    }

    /// Truncates the store and writes `bytes` in its place.
    pub(crate) fn replace_contents(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .set_len(0)
            .and_then(|()| self.file.seek(SeekFrom::Start(0)))
            .and_then(|_| self.file.write_all(bytes))
            .and_then(|()| self.file.flush())
            .map_err(|source| store_error(self.path, source))
    }
}

impl Drop for StoreLock<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn store_error(path: &Path, source: io::Error) -> Error {
    Error::StoreAccess {
        path: path.to_path_buf(),
        source,
    }
}
