//! Content fingerprints.
//!
//! A fingerprint is the first 128 bits of the BLAKE3 digest of a file's
//! bytes, hex encoded. Files are streamed in fixed-size chunks so memory
//! use does not grow with file size.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const CHUNK_SIZE: usize = 4096;
pub const FINGERPRINT_BYTES: usize = 16;

pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buf[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(encode(hasher.finalize()))
}

pub fn fingerprint_file(path: &Path) -> io::Result<String> {
    fingerprint_reader(File::open(path)?)
}

pub fn fingerprint_bytes(data: &[u8]) -> String {
    encode(blake3::hash(data))
}

fn encode(hash: blake3::Hash) -> String {
    hex::encode(&hash.as_bytes()[..FINGERPRINT_BYTES])
}
