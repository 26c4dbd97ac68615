// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record container format (.wtr)
//!
//! # Format Overview
//!
//! ```text
//! +---------------------------------------------------------+
//! |                    File Header (32 bytes)                |
//! |  Magic (8) | Version (4) | Flags (4) | EntryCount (8)   |
//! |  BlockCount (4) | MetaSize (4)                          |
//! +---------------------------------------------------------+
//! |                    Metadata (JSON)                       |
//! |  type name, value schema, key and value entry schemas   |
//! +---------------------------------------------------------+
//! |                    Block 0                               |
//! |  BlockHeader (12) | Entry[] | CRC32 (4)                 |
//! +---------------------------------------------------------+
//! |                    Block 1                               |
//! |  ...                                                     |
//! +---------------------------------------------------------+
//! ```
//!
//! # Entry Format
//!
//! ```text
//! +---------------------------------------------------------+
//! | key_len (4) | key (var) | value_len (4) | value (var)   |
//! +---------------------------------------------------------+
//! ```
//!
//! Keys and values are wire bytes produced by `wiretype::codec`. The entry
//! and block counts in the header are written when the writer finishes; a
//! file without the finished flag is rejected on open.

use crate::config::{IoConfig, WriteMode};
use crate::error::{IoError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Magic bytes: "WTREC\0\0\0"
pub const MAGIC: [u8; 8] = [0x57, 0x54, 0x52, 0x45, 0x43, 0x00, 0x00, 0x00];

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// File extension for record containers.
pub const EXTENSION: &str = "wtr";

/// Set once the writer has back-patched the counts.
pub const FLAG_FINISHED: u32 = 0x1;

/// File header (32 bytes, fixed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: [u8; 8],
    pub version: u32,
    pub flags: u32,
    pub entry_count: u64,
    pub block_count: u32,
    pub metadata_size: u32,
}

impl FileHeader {
    pub const SIZE: usize = 32;

    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            entry_count: 0,
            block_count: 0,
            metadata_size: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.flags & FLAG_FINISHED != 0
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.magic)?;
        w.write_u32::<LittleEndian>(self.version)?;
        w.write_u32::<LittleEndian>(self.flags)?;
        w.write_u64::<LittleEndian>(self.entry_count)?;
        w.write_u32::<LittleEndian>(self.block_count)?;
        w.write_u32::<LittleEndian>(self.metadata_size)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(IoError::InvalidFormat("bad record file magic".into()));
        }

        Ok(Self {
            magic,
            version: r.read_u32::<LittleEndian>()?,
            flags: r.read_u32::<LittleEndian>()?,
            entry_count: r.read_u64::<LittleEndian>()?,
            block_count: r.read_u32::<LittleEndian>()?,
            metadata_size: r.read_u32::<LittleEndian>()?,
        })
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Block header (12 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_id: u32,
    pub entry_count: u32,
    pub data_size: u32,
}

impl BlockHeader {
    pub const SIZE: usize = 12;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.block_id)?;
        w.write_u32::<LittleEndian>(self.entry_count)?;
        w.write_u32::<LittleEndian>(self.data_size)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            block_id: r.read_u32::<LittleEndian>()?,
            entry_count: r.read_u32::<LittleEndian>()?,
            data_size: r.read_u32::<LittleEndian>()?,
        })
    }
}

/// Self-description stored after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Rust type the records were written from.
    pub type_name: String,
    /// Canonical text of the value schema.
    pub schema: String,
    /// Canonical text of the entry key schema.
    pub key_schema: String,
    /// Canonical text of the entry value schema.
    pub value_schema: String,
    /// Written through a key/value table descriptor.
    #[serde(default)]
    pub table: bool,
    /// Library version that wrote the file.
    pub writer_version: String,
}

/// Counts reported by [`RecordWriter::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub entries: u64,
    pub blocks: u32,
}

fn length_prefix(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| IoError::InvalidFormat(format!("{} exceeds 4 GiB", what)))
}

/// Block-buffered entry writer.
pub struct RecordWriter {
    writer: BufWriter<File>,
    header: FileHeader,
    path: PathBuf,
    block: Vec<u8>,
    block_entries: u32,
    block_records: usize,
}

impl RecordWriter {
    /// Create a record file and write its header and metadata.
    pub fn create<P: AsRef<Path>>(
        path: P,
        metadata: &FileMetadata,
        config: &IoConfig,
    ) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();

        let file = match config.write_mode {
            WriteMode::Fail => OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => IoError::TargetExists(path.to_path_buf()),
                    _ => IoError::Io(e),
                })?,
            WriteMode::Overwrite => File::create(path)?,
        };
        let mut writer = BufWriter::new(file);

        let metadata_json = serde_json::to_vec(metadata)?;
        let mut header = FileHeader::new();
        header.metadata_size = length_prefix(metadata_json.len(), "metadata")?;

        // Counts are placeholders until finish.
        header.write(&mut writer)?;
        writer.write_all(&metadata_json)?;

        tracing::debug!(
            "Created record file {} for {}",
            path.display(),
            metadata.type_name
        );

        Ok(Self {
            writer,
            header,
            path: path.to_path_buf(),
            block: Vec::new(),
            block_entries: 0,
            block_records: config.block_records,
        })
    }

    /// Buffer one entry, flushing the block when it is full.
    pub fn write_entry(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.block
            .write_u32::<LittleEndian>(length_prefix(key.len(), "entry key")?)?;
        self.block.write_all(key)?;
        self.block
            .write_u32::<LittleEndian>(length_prefix(value.len(), "entry value")?)?;
        self.block.write_all(value)?;

        self.block_entries += 1;
        self.header.entry_count += 1;

        if self.block_entries as usize >= self.block_records {
            self.flush_block()?;
        }
        Ok(())
    }

    /// Entries written so far, including buffered ones.
    pub fn entry_count(&self) -> u64 {
        self.header.entry_count
    }

    fn flush_block(&mut self) -> Result<()> {
        if self.block_entries == 0 {
            return Ok(());
        }

        let header = BlockHeader {
            block_id: self.header.block_count,
            entry_count: self.block_entries,
            data_size: length_prefix(self.block.len(), "block")?,
        };
        header.write(&mut self.writer)?;
        self.writer.write_all(&self.block)?;
        self.writer
            .write_u32::<LittleEndian>(crc32fast::hash(&self.block))?;

        self.block.clear();
        self.block_entries = 0;
        self.header.block_count += 1;
        Ok(())
    }

    /// Flush the last block and back-patch the header.
    pub fn finish(mut self) -> Result<FileSummary> {
        self.flush_block()?;

        self.header.flags |= FLAG_FINISHED;
        self.writer.seek(SeekFrom::Start(0))?;
        self.header.write(&mut self.writer)?;
        self.writer.flush()?;

        tracing::info!(
            "Finished {}: {} entries in {} blocks",
            self.path.display(),
            self.header.entry_count,
            self.header.block_count
        );

        Ok(FileSummary {
            entries: self.header.entry_count,
            blocks: self.header.block_count,
        })
    }
}

/// Sequential entry reader.
pub struct RecordReader {
    reader: BufReader<File>,
    header: FileHeader,
    metadata: FileMetadata,
    verify_checksums: bool,
    block: Cursor<Vec<u8>>,
    block_id: u32,
    remaining_in_block: u32,
    blocks_read: u32,
    entries_read: u64,
}

impl RecordReader {
    /// Open a finished record file.
    pub fn open<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let header = FileHeader::read(&mut reader)?;
        if header.version != FORMAT_VERSION {
            return Err(IoError::VersionMismatch {
                expected: FORMAT_VERSION,
                got: header.version,
            });
        }
        if !header.is_finished() {
            return Err(IoError::InvalidFormat(format!(
                "{} was not finished by its writer",
                path.display()
            )));
        }

        let mut meta_buf = Vec::new();
        (&mut reader)
            .take(u64::from(header.metadata_size))
            .read_to_end(&mut meta_buf)?;
        if meta_buf.len() != header.metadata_size as usize {
            return Err(IoError::InvalidFormat("truncated metadata".into()));
        }
        let metadata: FileMetadata = serde_json::from_slice(&meta_buf)?;

        tracing::debug!(
            "Opened {}: {} entries of {}",
            path.display(),
            header.entry_count,
            metadata.type_name
        );

        Ok(Self {
            reader,
            header,
            metadata,
            verify_checksums: config.verify_checksums,
            block: Cursor::new(Vec::new()),
            block_id: 0,
            remaining_in_block: 0,
            blocks_read: 0,
            entries_read: 0,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// Read the next `(key, value)` entry.
    pub fn read_entry(&mut self) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        while self.remaining_in_block == 0 {
            if self.blocks_read == self.header.block_count {
                if self.entries_read != self.header.entry_count {
                    return Err(IoError::InvalidFormat(format!(
                        "header declares {} entries, blocks hold {}",
                        self.header.entry_count, self.entries_read
                    )));
                }
                return Ok(None);
            }
            self.load_block()?;
        }

        let key = self.read_field()?;
        let value = self.read_field()?;
        self.remaining_in_block -= 1;
        self.entries_read += 1;

        let block_end = self.block.get_ref().len() as u64;
        if self.remaining_in_block == 0 && self.block.position() != block_end {
            return Err(IoError::InvalidFormat(format!(
                "block {} has trailing bytes",
                self.block_id
            )));
        }
        Ok(Some((key, value)))
    }

    fn load_block(&mut self) -> Result<()> {
        let header = BlockHeader::read(&mut self.reader)?;
        if header.block_id != self.blocks_read {
            return Err(IoError::InvalidFormat(format!(
                "expected block {}, found block {}",
                self.blocks_read, header.block_id
            )));
        }
        if header.entry_count == 0 && header.data_size != 0 {
            return Err(IoError::InvalidFormat(format!(
                "block {} declares no entries but holds {} bytes",
                header.block_id, header.data_size
            )));
        }

        let mut data = Vec::new();
        (&mut self.reader)
            .take(u64::from(header.data_size))
            .read_to_end(&mut data)?;
        if data.len() != header.data_size as usize {
            return Err(IoError::InvalidFormat(format!(
                "block {} is truncated",
                header.block_id
            )));
        }

        let crc = self.reader.read_u32::<LittleEndian>()?;
        if self.verify_checksums && crc32fast::hash(&data) != crc {
            return Err(IoError::CrcMismatch {
                block_id: header.block_id,
            });
        }

        self.block = Cursor::new(data);
        self.block_id = header.block_id;
        self.remaining_in_block = header.entry_count;
        self.blocks_read += 1;
        Ok(())
    }

    fn read_field(&mut self) -> Result<Vec<u8>> {
        let block_id = self.block_id;
        let truncated =
            || IoError::InvalidFormat(format!("block {} entry is truncated", block_id));
        let len = self
            .block
            .read_u32::<LittleEndian>()
            .map_err(|_| truncated())? as usize;
        let available = self.block.get_ref().len() as u64 - self.block.position();
        if len as u64 > available {
            return Err(truncated());
        }
        let mut buf = vec![0u8; len];
        self.block.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Iterate over the remaining entries.
    pub fn entries(self) -> EntryIterator {
        EntryIterator {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over entries in a record file. Stops after the first error.
pub struct EntryIterator {
    reader: RecordReader,
    failed: bool,
}

impl Iterator for EntryIterator {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
