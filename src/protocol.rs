//! Resumable Upload Protocol Encoding
//!
//! This module handles the wire-level encoding for the resumable upload
//! protocol: query string construction for probe and upload requests, and the
//! multipart envelope that carries chunk bytes.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::errors::{Result, UploadError};
use crate::types::*;

/// Longest boundary allowed by RFC 2046
const MAX_BOUNDARY_LEN: usize = 70;

/// Appends query parameters to a URL
///
/// A `?` is appended if the URL has none. Pairs are written as `key=value`
/// joined by `&`. Values are inserted as-is with no percent-encoding, so
/// callers must pre-sanitize values containing reserved characters.
/// Existing parameters are never removed or deduplicated; when the URL
/// already carries a query, a `&` separates it from the new pairs.
///
/// Examples:
///   - ("http://host/up", {a: 1}) -> "http://host/up?a=1"
///   - ("http://host/up?", {a: 1}) -> "http://host/up?a=1"
///   - ("http://host/up?x=y", {a: 1}) -> "http://host/up?x=y&a=1"
///   - ("http://host/up", {}) -> "http://host/up?"
pub fn add_query_to_url(url: &str, params: &QueryParams) -> String {
    let mut result = String::with_capacity(url.len() + 1 + params.len() * 32);
    result.push_str(url);

    if !url.contains('?') {
        result.push('?');
    } else if !params.is_empty() && !url.ends_with('?') && !url.ends_with('&') {
        result.push('&');
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    result.push_str(&pairs.join("&"));

    result
}

/// Builds the query parameters of an existence probe
pub fn probe_query(session: &UploadSession, chunk_index: u64) -> QueryParams {
    let mut params = QueryParams::with_capacity(2);
    params.insert(PARAM_CHUNK_NUMBER.to_string(), chunk_index.to_string());
    params.insert(PARAM_UPLOAD_TOKEN.to_string(), session.token.clone());
    params
}

/// Builds the query parameters of a chunk upload
pub fn upload_query(session: &UploadSession, chunk_index: u64) -> QueryParams {
    let mut params = QueryParams::with_capacity(7);
    params.insert(PARAM_CHUNK_NUMBER.to_string(), chunk_index.to_string());
    params.insert(PARAM_FILENAME.to_string(), session.filename.clone());
    params.insert(PARAM_CHUNK_SIZE.to_string(), session.chunk_size.to_string());
    params.insert(PARAM_TOTAL_SIZE.to_string(), session.total_size.to_string());
    params.insert(PARAM_IDENTIFIER.to_string(), session.identifier.clone());
    params.insert(PARAM_TOTAL_CHUNKS.to_string(), session.total_chunks.to_string());
    params.insert(PARAM_UPLOAD_TOKEN.to_string(), session.token.clone());
    params
}

/// Generates a fresh multipart boundary
pub fn generate_boundary() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the request Content-Type for a multipart body
///
/// The format is `multipart/form-data;boundary=<boundary>` with no space
/// after the semicolon.
pub fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data;boundary={}", boundary)
}

/// Encodes one chunk as a single-part multipart/form-data body
///
/// The body format is:
///
/// ```text
/// --<boundary>\r\n
/// Content-Disposition: form-data; name="file"; filename="<filename>"\r\n
/// Content-Type: application/octet-stream\r\n
/// \r\n
/// <data>\r\n
/// --<boundary>--\r\n
/// ```
///
/// The filename goes through [`escape_header_value`]. Fails if the boundary
/// is empty, longer than 70 characters or contains characters outside the
/// RFC 2046 set.
pub fn encode_multipart(boundary: &str, filename: &str, data: &[u8]) -> Result<Bytes> {
    validate_boundary(boundary)?;

    let header = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\
         \r\n",
        boundary = boundary,
        field = MULTIPART_FIELD_NAME,
        filename = escape_header_value(filename),
        content_type = CHUNK_CONTENT_TYPE,
    );
    let trailer = format!("\r\n--{}--\r\n", boundary);

    let mut buf = BytesMut::with_capacity(header.len() + data.len() + trailer.len());
    buf.put_slice(header.as_bytes());
    buf.put_slice(data);
    buf.put_slice(trailer.as_bytes());

    Ok(buf.freeze())
}

/// Escapes a value for a quoted form-data header parameter
///
/// `"`, CR and LF become `%22`, `%0D` and `%0A`, as browsers encode
/// form-data filenames. Every other character is kept.
///
/// Examples:
///   - `say "hi".txt` -> `say %22hi%22.txt`
///   - "a\r\nb" -> "a%0D%0Ab"
pub fn escape_header_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn validate_boundary(boundary: &str) -> Result<()> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(UploadError::Encoding(format!(
            "boundary must be 1 to {} characters, got {}",
            MAX_BOUNDARY_LEN,
            boundary.len()
        )));
    }

    let valid = boundary
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "'()+_,-./:=?".contains(c));
    if !valid {
        return Err(UploadError::Encoding(format!(
            "boundary contains invalid characters: {:?}",
            boundary
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_query_without_question_mark() {
        let mut qs = QueryParams::new();
        qs.insert("a".to_string(), "1".to_string());

        assert_eq!(add_query_to_url("http://localhost:8080", &qs), "http://localhost:8080?a=1");
    }

    #[test]
    fn test_add_query_with_question_mark() {
        let mut qs = QueryParams::new();
        qs.insert("a".to_string(), "1".to_string());

        assert_eq!(add_query_to_url("http://localhost:8080?", &qs), "http://localhost:8080?a=1");
    }

    #[test]
    fn test_add_query_keeps_existing_params() {
        let mut qs = QueryParams::new();
        qs.insert("a".to_string(), "1".to_string());

        assert_eq!(
            add_query_to_url("http://localhost:8080/up?a=0", &qs),
            "http://localhost:8080/up?a=0&a=1"
        );
    }

    #[test]
    fn test_add_empty_query() {
        assert_eq!(add_query_to_url("http://localhost", &QueryParams::new()), "http://localhost?");
        assert_eq!(add_query_to_url("http://localhost?x=1", &QueryParams::new()), "http://localhost?x=1");
    }

    #[test]
    fn test_encode_multipart_layout() {
        let body = encode_multipart("XyZ", "a.bin", b"\x00\x01").unwrap();

        let expected: &[u8] = b"--XyZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.bin\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            \x00\x01\r\n\
            --XyZ--\r\n";
        assert_eq!(body.as_ref(), expected);
    }

    #[test]
    fn test_encode_multipart_escapes_filename() {
        let body = encode_multipart("b", "evil\".bin", b"").unwrap();

        let expected: &[u8] = b"--b\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"evil%22.bin\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            \r\n\
            --b--\r\n";
        assert_eq!(body.as_ref(), expected);
    }

    #[test]
    fn test_escape_header_value() {
        assert_eq!(escape_header_value("plain name.bin"), "plain name.bin");
        assert_eq!(escape_header_value("say \"hi\".txt"), "say %22hi%22.txt");
        assert_eq!(escape_header_value("a\r\nb"), "a%0D%0Ab");
    }

    #[test]
    fn test_encode_multipart_rejects_bad_boundary() {
        assert!(matches!(
            encode_multipart("", "a.bin", b""),
            Err(UploadError::Encoding(_))
        ));
        assert!(matches!(
            encode_multipart("with space", "a.bin", b""),
            Err(UploadError::Encoding(_))
        ));
    }

    #[test]
    fn test_generated_boundary_is_valid() {
        let boundary = generate_boundary();
        assert_eq!(boundary.len(), 32);
        assert!(validate_boundary(&boundary).is_ok());
    }
}
