use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::error::ImportError;

const FLATE_MARKER: &[u8] = b"FlateDecode";
const STREAM_KEYWORD: &[u8] = b"stream";
const ENDSTREAM_KEYWORD: &[u8] = b"endstream";

/// Pull every Flate-compressed stream out of a PDF file and return their
/// decoded text concatenated in file order, each followed by `"\r\n"`.
///
/// This is a byte scan, not a PDF parser: each section runs from a
/// `FlateDecode` marker to the next `stream` keyword, and its data ends at
/// the following `endstream`. Sections that do not inflate are skipped.
pub fn decode_content(data: &[u8]) -> Result<String, ImportError> {
    let mut text = String::new();
    let mut decoded = 0usize;

    for (index, raw) in flate_sections(data).into_iter().enumerate() {
        match inflate(raw) {
            Ok(bytes) => {
                debug!("PDF: stream {index} inflated to {} bytes", bytes.len());
                text.push_str(&String::from_utf8_lossy(&bytes));
                text.push_str("\r\n");
                decoded += 1;
            }
            Err(e) => warn!("PDF: skipping stream {index}, failed to inflate: {e}"),
        }
    }

    if decoded == 0 {
        return Err(ImportError::NoContentStreams);
    }
    Ok(text)
}

/// Raw bytes of each `FlateDecode` stream, in file order.
fn flate_sections(data: &[u8]) -> Vec<&[u8]> {
    let mut sections = Vec::new();
    let mut pos = 0;
    while let Some(marker) = find(data, FLATE_MARKER, pos) {
        let after_marker = marker + FLATE_MARKER.len();
        let Some(kw) = find(data, STREAM_KEYWORD, after_marker) else {
            break;
        };
        let body_start = kw + STREAM_KEYWORD.len();
        let Some(end) = find(data, ENDSTREAM_KEYWORD, body_start) else {
            break;
        };
        sections.push(trim_eol(&data[body_start..end]));
        pos = end + ENDSTREAM_KEYWORD.len();
    }
    sections
}

/// Strip the end-of-line after `stream` and the one before `endstream`.
fn trim_eol(mut body: &[u8]) -> &[u8] {
    while let [b'\r' | b'\n', rest @ ..] = body {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(b"\r\n") {
        body = rest;
    } else if let [rest @ .., b'\r' | b'\n'] = body {
        body = rest;
    }
    body
}

fn inflate(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(raw).read_to_end(&mut out)?;
    Ok(out)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(text: &str) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    fn pdf_object(id: u32, dict: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!("{id} 0 obj\n<< {dict} /Length {} >>\nstream\r\n", body.len()).into_bytes();
        out.extend_from_slice(body);
        out.extend_from_slice(b"\r\nendstream\nendobj\n");
        out
    }

    #[test]
    fn test_single_stream() {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend(pdf_object(4, "/Filter /FlateDecode", &zlib("0 0 m\n10 0 l\nS")));
        pdf.extend_from_slice(b"trailer\n%%EOF\n");

        let text = decode_content(&pdf).unwrap();
        assert_eq!(text, "0 0 m\n10 0 l\nS\r\n");
    }

    #[test]
    fn test_streams_concatenate_in_order() {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend(pdf_object(4, "/Filter /FlateDecode", &zlib("1 w")));
        pdf.extend(pdf_object(5, "/Filter /FlateDecode", &zlib("S")));
        let text = decode_content(&pdf).unwrap();
        assert_eq!(text, "1 w\r\nS\r\n");
    }

    #[test]
    fn test_uncompressed_stream_ignored() {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend(pdf_object(3, "", b"0 0 m"));
        pdf.extend(pdf_object(4, "/Filter /FlateDecode", &zlib("h")));
        let text = decode_content(&pdf).unwrap();
        assert_eq!(text, "h\r\n");
    }

    #[test]
    fn test_corrupt_stream_skipped() {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend(pdf_object(4, "/Filter /FlateDecode", b"not zlib at all"));
        pdf.extend(pdf_object(5, "/Filter /FlateDecode", &zlib("f")));
        let text = decode_content(&pdf).unwrap();
        assert_eq!(text, "f\r\n");
    }

    #[test]
    fn test_no_streams() {
        let err = decode_content(b"%PDF-1.4\ntrailer\n%%EOF").unwrap_err();
        assert!(matches!(err, ImportError::NoContentStreams));

        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend(pdf_object(4, "/Filter /FlateDecode", b"garbage"));
        assert!(matches!(
            decode_content(&pdf),
            Err(ImportError::NoContentStreams)
        ));
    }

    #[test]
    fn test_trim_eol() {
        assert_eq!(trim_eol(b"\r\nabc\r\n"), b"abc");
        assert_eq!(trim_eol(b"\nabc\n"), b"abc");
        assert_eq!(trim_eol(b"abc\n\n"), b"abc\n");
        assert_eq!(trim_eol(b"\r\n"), b"");
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"xxstreamyy", b"stream", 0), Some(2));
        assert_eq!(find(b"xxstreamyy", b"stream", 3), None);
        assert_eq!(find(b"abc", b"abc", 3), None);
        assert_eq!(find(b"ab", b"abc", 0), None);
    }
}
