//! Object-image loader: origin word + big-endian payload into memory.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::bits::swap16;
use crate::error::LoadError;
use crate::memory::Memory;

/// Load the image at `path` into `memory`. See `load_from` for the format.
pub fn load_image(memory: &mut Memory, path: &Path) -> Result<u16, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from(memory, file).map_err(|source| match source.kind() {
        io::ErrorKind::UnexpectedEof if source.to_string() == EMPTY_MARKER => LoadError::Empty {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

const EMPTY_MARKER: &str = "no origin word";

/// Read one big-endian-word-per-u16 image from `reader` into `memory`.
/// Words beyond `0xFFFF` are silently dropped; an image with fewer words
/// than fit leaves the remainder of memory untouched. Returns the origin.
fn load_from(memory: &mut Memory, mut reader: impl Read) -> io::Result<u16> {
    let origin = match read_be_word(&mut reader)? {
        Some(word) => word,
        None => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, EMPTY_MARKER)),
    };

    let mut addr = origin;
    loop {
        if addr == 0xFFFF {
            // one more word fits exactly at the top of the address space;
            // read it, then stop regardless of what follows.
            if let Some(word) = read_be_word(&mut reader)? {
                memory.write(addr, word);
            }
            break;
        }
        match read_be_word(&mut reader)? {
            Some(word) => {
                memory.write(addr, word);
                addr = addr.wrapping_add(1);
            }
            None => break,
        }
    }
    Ok(origin)
}

/// Read one 16-bit word in native order and byte-swap it, mirroring the
/// on-disk big-endian / in-memory host-endian convention (§4.1, §4.4).
fn read_be_word(reader: &mut impl Read) -> io::Result<Option<u16>> {
    let mut buf = [0u8; 2];
    if reader.read(&mut buf[..1])? == 0 {
        return Ok(None);
    }
    // a lone trailing byte is treated as end of file: no complete word to load.
    if reader.read(&mut buf[1..2])? == 0 {
        return Ok(None);
    }
    Ok(Some(swap16(u16::from_ne_bytes(buf))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn word_bytes(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn loads_origin_and_payload() {
        let mut mem = Memory::new();
        let bytes = word_bytes(&[0x3000, 0x1027, 0xF025]);
        let origin = load_from(&mut mem, Cursor::new(bytes)).unwrap();
        assert_eq!(origin, 0x3000);
        assert_eq!(mem.peek(0x3000), 0x1027);
        assert_eq!(mem.peek(0x3001), 0xF025);
    }

    #[test]
    fn truncates_at_top_of_address_space() {
        let mut mem = Memory::new();
        let bytes = word_bytes(&[0xFFFE, 0x1111, 0x2222, 0x3333]);
        let origin = load_from(&mut mem, Cursor::new(bytes)).unwrap();
        assert_eq!(origin, 0xFFFE);
        assert_eq!(mem.peek(0xFFFE), 0x1111);
        assert_eq!(mem.peek(0xFFFF), 0x2222);
        // 0x3333 had nowhere to go; no wraparound write to 0x0000
        assert_eq!(mem.peek(0x0000), 0x0000);
    }

    #[test]
    fn short_file_leaves_remainder_unchanged() {
        let mut mem = Memory::new();
        mem.write(0x3002, 0xBEEF);
        let bytes = word_bytes(&[0x3000, 0x1111]);
        load_from(&mut mem, Cursor::new(bytes)).unwrap();
        assert_eq!(mem.peek(0x3000), 0x1111);
        assert_eq!(mem.peek(0x3002), 0xBEEF);
    }

    #[test]
    fn later_load_overwrites_earlier_at_overlap() {
        let mut mem = Memory::new();
        load_from(&mut mem, Cursor::new(word_bytes(&[0x3000, 0xAAAA, 0xBBBB]))).unwrap();
        load_from(&mut mem, Cursor::new(word_bytes(&[0x3001, 0xCCCC]))).unwrap();
        assert_eq!(mem.peek(0x3000), 0xAAAA);
        assert_eq!(mem.peek(0x3001), 0xCCCC);
    }

    #[test]
    fn empty_file_is_an_error() {
        let mut mem = Memory::new();
        let err = load_from(&mut mem, Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
