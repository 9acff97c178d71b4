//! Types for reading streamed ZIP archives
//!

use binrw::BinRead;
use indexmap::IndexMap;
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{self, Read, Seek, SeekFrom},
    sync::Arc,
};

use crate::{
    error::{Error, FileNotFoundError, Result},
    types::{CentralDirectoryHeader, CompressionMethod, EndOfCentralDirectory, LocalFileHeader},
};

/// Fixed byte length of a local file header, excluding the name and extra field.
const LOCAL_HEADER_LENGTH: u64 = 30;

/// Fixed byte length of the end of central directory record, excluding the comment.
const END_OF_DIRECTORY_LENGTH: u64 = 22;

/// How far from the end of the file to scan for the end of central directory signature.
/// The record is 22 bytes and a trailing comment can add up to 65535 more.
const END_OF_DIRECTORY_SCAN_LIMIT: u64 = END_OF_DIRECTORY_LENGTH + 65_535;

/// A struct for reading an entry from a ZIP file
pub struct ZipFile<'a, R: Read + Seek> {
    data: Cow<'a, ZipFileData>,
    reader: io::Take<&'a mut R>,
}

impl<'a, R: Read + Seek> Debug for ZipFile<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ZipFile({:#?})", self.get_metadata())
    }
}

/// Methods for retrieving information on ZIP file entries
impl<'a, R: Read + Seek> ZipFile<'a, R> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`). Carelessly writing to these paths
    /// allows an attacker to craft a ZIP archive that will overwrite critical
    /// files.
    ///
    pub fn name(&self) -> &str {
        &self.get_metadata().file_name
    }

    /// Get the name of the file, in the raw (internal) byte representation.
    ///
    /// This library always writes names as UTF-8, but nothing in the format
    /// guarantees it.
    pub fn name_raw(&self) -> &[u8] {
        &self.get_metadata().file_name_raw
    }

    /// Get the size of the file, in bytes, in the archive
    pub fn compressed_size(&self) -> u64 {
        self.get_metadata().compressed_size
    }

    /// Get the size of the file, in bytes, when extracted
    pub fn size(&self) -> u64 {
        self.get_metadata().uncompressed_size
    }

    /// Get the CRC32 hash of the original file
    pub fn crc32(&self) -> u32 {
        self.get_metadata().crc32
    }

    /// Get the starting offset of this entry's local file header
    pub fn header_start(&self) -> u64 {
        self.get_metadata().header_start
    }

    /// Get the starting offset of the data of the file
    pub fn data_start(&self) -> u64 {
        self.get_metadata().data_start
    }

    /// Get the storage method used for this file
    pub fn compression_method(&self) -> CompressionMethod {
        self.get_metadata().compression_method
    }

    fn get_metadata(&self) -> &ZipFileData {
        self.data.as_ref()
    }
}

impl<R: Read + Seek> Read for ZipFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Structure representing a ZIP file entry.
#[derive(Debug, Clone, Default)]
pub struct ZipFileData {
    /// CRC32 checksum of the entry data
    pub crc32: u32,
    /// Method used to store the file in the zip
    pub compression_method: CompressionMethod,
    /// Size of the file in the zip
    pub compressed_size: u64,
    /// Size of the file when extracted
    pub uncompressed_size: u64,
    /// Name of the file
    pub file_name: Box<str>,
    /// Raw file name. To be used when file_name was incorrectly decoded.
    pub file_name_raw: Box<[u8]>,
    /// Specifies where the local header of the file starts
    pub header_start: u64,
    /// Specifies where the stored data of the file starts
    pub data_start: u64,
}

#[derive(Debug)]
pub(crate) struct Shared {
    end_of_directory: EndOfCentralDirectory,
    files: IndexMap<Box<str>, ZipFileData>,
}

/// ZIP archive reader
///
/// Only archives using the stored (uncompressed) method are supported, which covers
/// everything this library writes.
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_zip_contents(reader: impl Read + Seek) -> zipstream::error::Result<()> {
///     let mut zip = zipstream::ZipArchive::new(reader)?;
///
///     for i in 0..zip.len() {
///         let mut file = zip.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct ZipArchive<R> {
    reader: R,
    shared: Arc<Shared>,
}

impl<R> ZipArchive<R> {
    /// Total size of the files in the archive, if it can be known. Doesn't include
    /// metadata.
    pub fn total_size(&self) -> Option<u128> {
        let mut total = 0u128;
        for file in self.shared.files.values() {
            total = total.checked_add(file.uncompressed_size as u128)?;
        }
        Some(total)
    }
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Read a ZIP archive collecting the files it contains.
    pub fn new(mut reader: R) -> Result<ZipArchive<R>> {
        if let Ok(shared) = Self::get_metadata(&mut reader) {
            return Ok(ZipArchive {
                reader,
                shared: shared.into(),
            });
        }

        Err(Error::InvalidArchive)
    }

    /// Number of entries contained in this ZIP.
    pub fn len(&self) -> usize {
        self.shared.files.len()
    }

    /// Whether this ZIP archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all the file names in this archive.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.files.keys().map(|s| s.as_ref())
    }

    /// Returns the offset where the central directory starts.
    pub fn directory_offset(&self) -> u64 {
        self.shared.end_of_directory.directory_offset as u64
    }

    /// Returns the byte length of the central directory.
    pub fn directory_size(&self) -> u64 {
        self.shared.end_of_directory.directory_size as u64
    }

    /// Get the index of a file entry by name, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.files.get_index_of(name)
    }

    /// Get the name of a file entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared
            .files
            .get_index(index)
            .map(|(name, _)| name.as_ref())
    }

    /// Search for a file entry by name
    pub fn by_name(&mut self, name: &str) -> Result<ZipFile<'_, R>> {
        let Some(index) = self.shared.files.get_index_of(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&mut self, file_number: usize) -> Result<ZipFile<'_, R>> {
        let (_, data) = self
            .shared
            .files
            .get_index(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        self.reader.seek(SeekFrom::Start(data.data_start))?;

        Ok(ZipFile {
            reader: self.reader.by_ref().take(data.compressed_size),
            data: Cow::Borrowed(data),
        })
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn find_end_of_directory(reader: &mut R) -> Result<u64> {
        let file_length = reader.seek(SeekFrom::End(0))?;
        if file_length < END_OF_DIRECTORY_LENGTH {
            return Err(Error::InvalidArchive);
        }

        let scan_start = file_length.saturating_sub(END_OF_DIRECTORY_SCAN_LIMIT);
        reader.seek(SeekFrom::Start(scan_start))?;

        let mut tail = Vec::with_capacity((file_length - scan_start) as usize);
        reader.read_to_end(&mut tail)?;

        tail.windows(4)
            .rposition(|window| window == b"PK\x05\x06")
            .map(|position| scan_start + position as u64)
            .ok_or(Error::InvalidArchive)
    }

    fn get_directory(
        reader: &mut R,
        end_of_directory: &EndOfCentralDirectory,
    ) -> Result<Vec<(CentralDirectoryHeader, Vec<u8>)>> {
        reader.seek(SeekFrom::Start(end_of_directory.directory_offset as u64))?;

        (0..end_of_directory.entries_total)
            .map(|_| {
                let record = CentralDirectoryHeader::read(&mut *reader)?;

                let mut name_raw = vec![0u8; record.name_length as usize];
                reader.read_exact(&mut name_raw)?;
                reader.seek(SeekFrom::Current(
                    i64::from(record.extra_length) + i64::from(record.comment_length),
                ))?;

                Ok((record, name_raw))
            })
            .collect()
    }

    fn get_metadata(reader: &mut R) -> Result<Shared> {
        let end_position = Self::find_end_of_directory(reader)?;
        reader.seek(SeekFrom::Start(end_position))?;
        let end_of_directory = EndOfCentralDirectory::read(reader)?;

        let records = Self::get_directory(reader, &end_of_directory)?;

        let mut files = IndexMap::with_capacity(records.len());
        for (record, name_raw) in records {
            // The local header's own name and extra lengths decide where the data
            // starts; they are not required to match the central directory's.
            reader.seek(SeekFrom::Start(record.header_offset as u64))?;
            let local = LocalFileHeader::read(&mut *reader)?;

            let file = ZipFileData {
                crc32: record.crc32,
                compression_method: record.compression,
                compressed_size: record.compressed_size as u64,
                uncompressed_size: record.uncompressed_size as u64,
                file_name: String::from_utf8_lossy(&name_raw).into(),
                file_name_raw: name_raw.into(),
                header_start: record.header_offset as u64,
                data_start: record.header_offset as u64
                    + LOCAL_HEADER_LENGTH
                    + u64::from(local.name_length)
                    + u64::from(local.extra_length),
            };
            files.insert(file.file_name.clone(), file);
        }

        Ok(Shared {
            end_of_directory,
            files,
        })
    }
}
