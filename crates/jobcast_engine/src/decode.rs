use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use jobcast_logging::jobcast_warn;

use crate::FetchOutput;

/// A fetched listing page as UTF-8 text, with the URL it was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub html: String,
    pub source_url: String,
    pub encoding_label: String,
}

impl RawDocument {
    /// Wrap already-decoded markup, e.g. a saved fixture.
    pub fn from_html(html: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            source_url: source_url.into(),
            encoding_label: "UTF-8".to_string(),
        }
    }
}

pub fn decode_document(output: &FetchOutput) -> RawDocument {
    let (html, encoding) = decode_html(&output.bytes, output.metadata.content_type.as_deref());
    RawDocument {
        html,
        source_url: output.metadata.final_url.clone(),
        encoding_label: encoding.name().to_string(),
    }
}

/// Decode raw bytes using: BOM -> Content-Type charset -> chardetng guess.
///
/// Malformed sequences are replaced rather than rejected; listing pages with a
/// few broken bytes still carry usable job rows.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> (String, &'static Encoding) {
    let encoding = detect_encoding(bytes, content_type);
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        jobcast_warn!("replaced malformed {} sequences while decoding", actual.name());
    }
    (text.into_owned(), actual)
}

fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(enc) = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return enc;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
    })
}
