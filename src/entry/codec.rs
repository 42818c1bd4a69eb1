//! Entry codec
//!
//! An entry is stored as a single value:
//!
//! ```text
//! +---------+-------------------------------+------------------+
//! | version | header (MessagePack, named)   | content (`size`) |
//! +---------+-------------------------------+------------------+
//! ```
//!
//! The header map is self-delimiting, so the content is simply every byte
//! that follows it.

use std::borrow::Cow;
use std::io::Cursor;

use crate::entry::header::Header;
use crate::error::CodecError;

pub const ENTRY_VERSION: u8 = 1;

/// Serialize a header and its content into one stored value.
///
/// Directory content is never stored; a directory is always written with a
/// size of zero.
pub fn encode(header: &Header, content: &[u8]) -> Result<Vec<u8>, CodecError> {
    let (header, content) = if header.is_dir() {
        let mut dir = header.clone();
        dir.size = 0;
        (Cow::Owned(dir), &[][..])
    } else {
        if header.size != content.len() as u64 {
            return Err(CodecError::SizeMismatch {
                expected: header.size,
                actual: content.len() as u64,
            });
        }
        (Cow::Borrowed(header), content)
    };

    let mut out = Vec::with_capacity(1 + 64 + header.name.len() + content.len());
    out.push(ENTRY_VERSION);
    rmp_serde::encode::write_named(&mut out, &*header)?;
    out.extend_from_slice(content);
    Ok(out)
}

/// Parse a stored value back into its header and content.
pub fn decode(bytes: &[u8]) -> Result<(Header, Vec<u8>), CodecError> {
    let (&version, rest) = bytes.split_first().ok_or(CodecError::Empty)?;
    if version != ENTRY_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let mut cursor = Cursor::new(rest);
    let header: Header = rmp_serde::decode::from_read(&mut cursor)?;
    let content = &rest[cursor.position() as usize..];

    if header.is_dir() && !content.is_empty() {
        return Err(CodecError::DirectoryContent(content.len()));
    }
    if header.size != content.len() as u64 {
        return Err(CodecError::SizeMismatch {
            expected: header.size,
            actual: content.len() as u64,
        });
    }

    Ok((header, content.to_vec()))
}
