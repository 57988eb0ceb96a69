//! Safe text reading with encoding detection.

use std::fs;
use std::io;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::WINDOWS_1252;

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8192;

/// A file is treated as binary when its leading window contains a NUL byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Read a file as text. Returns `Ok(None)` for binary content.
///
/// Decoding tries strict UTF-8 first (a BOM is tolerated), then the encoding
/// guessed by chardetng, then Windows-1252, which cannot fail.
pub fn read_file_safe(path: &Path) -> io::Result<Option<String>> {
    let bytes = fs::read(path)?;
    if is_binary(&bytes) {
        return Ok(None);
    }
    Ok(Some(decode_text(&bytes)))
}

fn decode_text(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.trim_start_matches('\u{feff}').to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);
    let (text, _, had_errors) = guessed.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::{is_binary, read_file_safe};
    use std::fs;

    #[test]
    fn utf8_content_reads_verbatim() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("a.py");
        fs::write(&path, "print('héllo')\n").expect("write file");
        let content = read_file_safe(&path).expect("read").expect("text");
        assert_eq!(content, "print('héllo')\n");
    }

    #[test]
    fn bom_is_stripped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bom.py");
        fs::write(&path, b"\xef\xbb\xbfx = 1\n").expect("write file");
        let content = read_file_safe(&path).expect("read").expect("text");
        assert_eq!(content, "x = 1\n");
    }

    #[test]
    fn legacy_single_byte_content_still_decodes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("latin.py");
        // "café" in Latin-1 / Windows-1252
        fs::write(&path, b"caf\xe9\n").expect("write file");
        let content = read_file_safe(&path).expect("read").expect("text");
        assert!(content.contains("caf"));
        assert!(!content.contains('\u{fffd}'));
    }

    #[test]
    fn nul_bytes_mark_the_file_binary() {
        assert!(is_binary(b"ELF\x00\x01\x02"));
        assert!(!is_binary(b"plain text"));

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("blob.bin");
        fs::write(&path, b"\x00\x01\x02").expect("write file");
        assert!(read_file_safe(&path).expect("read").is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(read_file_safe(std::path::Path::new("/definitely/not/here.py")).is_err());
    }
}
