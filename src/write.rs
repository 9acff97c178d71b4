//! Types for writing streamed ZIP archives
//!

use binrw::io::NoSeek;
use binrw::BinWrite;
use bon::Builder;
use crc::Digest;
use std::io::{self, Read, Write};
use tracing::{debug, instrument, Level};

use crate::checksum;
use crate::error::{Error, Result};
use crate::timestamp::DosDateTime;
use crate::types::{CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, LocalFileHeader};

/// Options for how the ZIP file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct ZipWriterOptions {
    /// A fixed modification timestamp applied to every entry
    ///
    /// When unset, each entry's timestamp is captured independently at the moment its
    /// header is written, so entries written moments apart can carry different encoded
    /// timestamps. Set this to make the output byte-for-byte deterministic.
    pub timestamp: Option<DosDateTime>,
}

impl Default for ZipWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Forward-only writer that tracks how many bytes have been flushed downstream.
///
/// The count is the single source of truth for every offset recorded in the archive.
struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    const fn bytes_written(&self) -> u64 {
        self.count
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Per-entry state between the local file header and the data descriptor.
struct ZipEntryState {
    record: CentralDirectoryHeader,
    name: Vec<u8>,
    digest: Digest<'static, u32>,
    size: u64,
}

/// Streamed ZIP archive generator
///
/// Entries are written strictly sequentially: a local file header with deferred sizes,
/// the entry data, then a data descriptor with the final checksum and sizes. Nothing is
/// buffered or rewritten, so the sink only needs [`Write`]. [`ZipStreamWriter::finish`]
/// emits the central directory and the end of central directory record.
///
/// ```
/// # fn doit() -> zipstream::error::Result<()>
/// # {
/// # use zipstream::ZipStreamWriter;
/// use std::io::Write;
/// use zipstream::write::ZipWriterOptions;
///
/// // We use a buffer here, though you'd normally use a socket or response body
/// let mut zip = ZipStreamWriter::new(Vec::new(), ZipWriterOptions::default());
///
/// zip.start_file("hello_world.txt")?;
/// zip.write_all(b"Hello, World!")?;
///
/// // Emit the central directory and finish the archive.
/// let buf = zip.finish()?;
/// # assert!(!buf.is_empty());
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct ZipStreamWriter<W: Write> {
    inner: CountingWriter<W>,
    current: Option<ZipEntryState>,
    directory: Vec<(CentralDirectoryHeader, Vec<u8>)>,
    options: ZipWriterOptions,
}

impl<W: Write> ZipStreamWriter<W> {
    /// Initializes the archive.
    ///
    /// Before writing to this object, the [`ZipStreamWriter::start_file`] function
    /// should be called. Once bytes have reached the sink they cannot be retracted, so
    /// any failure leaves the sink holding a truncated, invalid archive and must be
    /// treated as fatal to the whole generation call.
    pub fn new(inner: W, options: ZipWriterOptions) -> ZipStreamWriter<W> {
        ZipStreamWriter {
            inner: CountingWriter::new(inner),
            current: None,
            directory: Vec::new(),
            options,
        }
    }

    /// Returns true if a file is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.current.is_some()
    }

    /// Total bytes flushed to the sink so far.
    pub const fn bytes_written(&self) -> u64 {
        self.inner.bytes_written()
    }

    /// Start a new file entry.
    ///
    /// Finishes the previous entry if one is still open. The entry's timestamp is
    /// captured now, before any of its data has been read. The name is written as
    /// UTF-8 without any sanitization; guarding against path traversal when the
    /// archive is later extracted is the caller's responsibility.
    #[instrument(skip(self, name), err)]
    pub fn start_file(&mut self, name: impl ToString) -> Result<()> {
        if self.current.is_some() {
            self.finish_file()?;
        }

        let name = name.to_string().into_bytes();
        let name_length = u16::try_from(name.len()).map_err(|_| Error::SizeLimitExceeded)?;
        let header_offset =
            u32::try_from(self.inner.bytes_written()).map_err(|_| Error::SizeLimitExceeded)?;
        let modified = self.options.timestamp.unwrap_or_else(DosDateTime::now);

        let header = LocalFileHeader {
            modified,
            name_length,
            ..Default::default()
        };
        header
            .write(&mut NoSeek::new(&mut self.inner))
            .map_err(Error::for_sink)?;
        self.inner.write_all(&name).map_err(Error::SinkWrite)?;

        self.current = Some(ZipEntryState {
            record: CentralDirectoryHeader {
                modified,
                name_length,
                header_offset,
                ..Default::default()
            },
            name,
            digest: checksum::digest(),
            size: 0,
        });

        Ok(())
    }

    #[instrument(skip(self), err)]
    fn finish_file(&mut self) -> Result<()> {
        let entry = self
            .current
            .take()
            .expect("an entry should always be open when finishing one");

        let size = u32::try_from(entry.size).map_err(|_| Error::SizeLimitExceeded)?;
        let crc32 = entry.digest.finalize();

        let descriptor = DataDescriptor {
            crc32,
            compressed_size: size,
            uncompressed_size: size,
        };
        descriptor
            .write(&mut NoSeek::new(&mut self.inner))
            .map_err(Error::for_sink)?;

        let mut record = entry.record;
        record.crc32 = crc32;
        record.compressed_size = size;
        record.uncompressed_size = size;
        self.directory.push((record, entry.name));

        Ok(())
    }

    /// Finish the last entry and write the central directory and summary record
    ///
    /// This will return the sink, but one should normally not append any data to the
    /// end of the file.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        if self.current.is_some() {
            self.finish_file()?;
        }

        let directory_offset =
            u32::try_from(self.inner.bytes_written()).map_err(|_| Error::SizeLimitExceeded)?;
        let entries = u16::try_from(self.directory.len()).map_err(|_| Error::SizeLimitExceeded)?;

        for (record, name) in &self.directory {
            record
                .write(&mut NoSeek::new(&mut self.inner))
                .map_err(Error::for_sink)?;
            self.inner.write_all(name).map_err(Error::SinkWrite)?;
        }

        let directory_end =
            u32::try_from(self.inner.bytes_written()).map_err(|_| Error::SizeLimitExceeded)?;

        let record = EndOfCentralDirectory {
            entries_on_disk: entries,
            entries_total: entries,
            directory_size: directory_end - directory_offset,
            directory_offset,
            ..Default::default()
        };
        record
            .write(&mut NoSeek::new(&mut self.inner))
            .map_err(Error::for_sink)?;

        Ok(self.inner.into_inner())
    }
}

impl<W: Write> Write for ZipStreamWriter<W> {
    #[instrument(skip_all, err, ret(level = Level::TRACE), fields(size = buf.len()))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(entry) = self.current.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            ));
        };

        let written = self.inner.write(buf)?;
        entry.digest.update(&buf[..written]);
        entry.size += written as u64;

        Ok(written)
    }

    #[instrument(skip(self), err)]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A named, forward-only byte source for one archive entry
///
/// The content is consumed exactly once; there is no assumption of pre-buffering or a
/// known total length. Blocking reads are the suspension point when the next chunk of
/// content is not yet available.
pub struct ZipEntrySource<R> {
    /// The entry's file name inside the archive, UTF-8 encoded on output
    pub name: String,

    /// The entry's data
    pub content: R,
}

impl<R> ZipEntrySource<R> {
    /// Pair a name with its content source.
    pub fn new(name: impl ToString, content: R) -> Self {
        Self {
            name: name.to_string(),
            content,
        }
    }
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Stream an ordered collection of entries into one complete ZIP archive.
///
/// Entries are processed strictly sequentially; two entries' bytes are never
/// interleaved in the output. A failure of either side aborts the whole call:
/// [`Error::ContentSource`] when an entry's content fails mid-read,
/// [`Error::SinkWrite`] when the sink rejects a write. No directory record is kept for
/// a failed entry and the sink is left holding truncated archive bytes.
#[instrument(skip_all, err)]
pub fn write_archive<W, R, I>(entries: I, sink: W, options: ZipWriterOptions) -> Result<W>
where
    W: Write,
    R: Read,
    I: IntoIterator<Item = ZipEntrySource<R>>,
{
    let mut writer = ZipStreamWriter::new(sink, options);
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    for entry in entries {
        debug!(name = %entry.name, "adding entry");
        writer.start_file(entry.name)?;

        let mut content = entry.content;
        loop {
            let read = match content.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::ContentSource(err)),
            };
            writer.write_all(&buffer[..read]).map_err(Error::SinkWrite)?;
        }
    }

    writer.finish()
}
