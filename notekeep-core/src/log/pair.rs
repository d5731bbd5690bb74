//! Append handles for the data/index log pair and positioned data reads

use super::{IndexEntry, DATA_FILENAME, INDEX_FILENAME};
use crate::Result;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// Append-mode handles for both logs
///
/// Lives inside the write serializer: offset assignment reads the tracked
/// data-log length and then appends, which is only safe while no other
/// mutation is in flight. Readers never touch these handles.
pub struct LogPair {
    data: File,
    index: File,
    data_len: u64,
}

impl LogPair {
    /// Open (creating if absent) both log files in append-plus-read mode
    pub async fn open(dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let data = Self::open_log(&dir.join(DATA_FILENAME)).await?;
        let index = Self::open_log(&dir.join(INDEX_FILENAME)).await?;
        let data_len = data.metadata().await?.len();

        Ok(Self {
            data,
            index,
            data_len,
        })
    }

    async fn open_log(path: &Path) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)
            .await?;
        Ok(file)
    }

    /// Append one encoded note line to the data log
    ///
    /// Returns `(offset, length)` of the written bytes, where `offset` equals
    /// the data log's size immediately before the write.
    pub async fn append_data(&mut self, line: &str) -> Result<(u64, u64)> {
        let offset = self.data_len;
        self.data.write_all(line.as_bytes()).await?;
        self.data.flush().await?;
        self.data_len += line.len() as u64;
        Ok((offset, line.len() as u64))
    }

    /// Append one entry line to the index log
    pub async fn append_index(&mut self, entry: &IndexEntry) -> Result<()> {
        let line = entry.encode()?;
        self.index.write_all(line.as_bytes()).await?;
        self.index.flush().await?;
        Ok(())
    }

    /// Empty both logs to zero length
    pub async fn truncate_both(&mut self) -> Result<()> {
        self.data.set_len(0).await?;
        self.index.set_len(0).await?;
        self.data_len = 0;
        Ok(())
    }

    /// Current data log length in bytes
    pub fn data_len(&self) -> u64 {
        self.data_len
    }
}

/// Read handle for positioned reads from the data log
///
/// Separate from the append handles so reads never wait on the write
/// serializer; bytes at a published offset/length are never mutated in place,
/// so reading them concurrently with appends is safe.
pub struct DataReader {
    file: Mutex<File>,
}

impl DataReader {
    /// Open a read-only handle on the data log (the file must already exist)
    pub async fn open(dir: &Path) -> Result<Self> {
        let file = File::open(dir.join(DATA_FILENAME)).await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Read exactly `length` bytes starting at `offset`
    pub async fn read_at(&self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(offset)).await?;
        let mut buf = vec![0u8; length as usize];
        file.read_exact(&mut buf).await?;
        Ok(buf)
    }
}
