//! Text file reading with binary detection and lossy UTF-8 decoding.
//!
//! - Binary files (a null byte in the first 1 KiB) read as empty text
//! - Invalid UTF-8 sequences are dropped rather than replaced
//! - Open and read failures are reported, never mistaken for binary content

use crate::error::FileReadError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const BINARY_SAMPLE_SIZE: usize = 1024;

/// Reads file text for the extractors.
pub trait FileReader {
    /// Full text of `path`. Missing and binary files yield an empty string;
    /// other I/O failures are errors.
    fn read_file(&self, path: &Path) -> Result<String, FileReadError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemReader;

impl FileReader for FilesystemReader {
    fn read_file(&self, path: &Path) -> Result<String, FileReadError> {
        if !path.is_file() {
            return Ok(String::new());
        }

        File::open(path)
            .and_then(|mut file| read_text(&mut file))
            .map_err(|source| FileReadError {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Sample the head of `reader` for a null byte, then read the rest from the
/// same handle. Binary content yields an empty string.
pub fn read_text(reader: &mut impl Read) -> io::Result<String> {
    let mut bytes = vec![0u8; BINARY_SAMPLE_SIZE];
    let sampled = read_up_to(reader, &mut bytes)?;
    bytes.truncate(sampled);
    if bytes.contains(&0) {
        return Ok(String::new());
    }

    reader.read_to_end(&mut bytes)?;
    Ok(decode_text(&bytes))
}

/// Null-byte probe over the first [`BINARY_SAMPLE_SIZE`] bytes.
///
/// Unreadable files count as binary. Invalid UTF-8 alone does not.
pub fn is_binary_file(path: &Path) -> bool {
    let mut sample = [0u8; BINARY_SAMPLE_SIZE];
    let read = File::open(path).and_then(|mut file| read_up_to(&mut file, &mut sample));
    match read {
        Ok(len) => sample[..len].contains(&0),
        Err(_) => true,
    }
}

fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Decode bytes as UTF-8, skipping invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
