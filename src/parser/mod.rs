//! Document normalizer.
//!
//! Turns named byte streams into a [`NormalizedBatch`]:
//! 1. normalize `\r\n` line endings and split on `\n---\n`
//! 2. peek `apiVersion` and `kind` of each document
//! 3. expand `v1/List` documents item by item
//! 4. decode recognized pairs through the [`Scheme`], skip the rest
//!
//! Decode failures are recorded on the batch and never stop the run.

pub mod scheme;

pub use scheme::{DecodeFn, Scheme};

use crate::context::NormalizedBatch;
use crate::error::DecodeError;
use crate::types::FileLocation;
use rayon::prelude::*;
use serde::Deserialize;
use serde_yaml::Value;

const SEPARATOR: &[u8] = b"\n---\n";

/// One named input stream, e.g. the contents of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes())
    }
}

/// One document cut out of a source, before any YAML parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub location: FileLocation,
}

/// Split a source into documents.
///
/// Line endings are normalized first. Each document records the 1-based line
/// it starts on and its 0-based index within the source. Blank documents are
/// kept here and dropped later.
pub fn split_documents(name: &str, bytes: &[u8]) -> Vec<RawDocument> {
    let normalized = normalize_line_endings(bytes);
    let mut documents = Vec::new();
    let mut line = 1;
    let mut rest: &[u8] = &normalized;

    loop {
        let (chunk, next) = match find(rest, SEPARATOR) {
            Some(pos) => (&rest[..pos], Some(&rest[pos + SEPARATOR.len()..])),
            None => (rest, None),
        };

        documents.push(RawDocument {
            bytes: chunk.to_vec(),
            location: FileLocation::new(name, line, documents.len()),
        });

        match next {
            Some(next) => {
                line += count_newlines(chunk) + 2;
                rest = next;
            }
            None => break,
        }
    }

    documents
}

fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// True when a document holds nothing but whitespace, comments and markers.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[derive(Debug, Deserialize)]
struct DetectKind {
    #[serde(rename = "apiVersion", default)]
    api_version: String,
    #[serde(default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ListItems {
    #[serde(default)]
    items: Vec<Value>,
}

/// Parses sources into a [`NormalizedBatch`] using a [`Scheme`].
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    scheme: Scheme,
}

impl DocumentParser {
    pub fn new(scheme: Scheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Parse every source in order.
    ///
    /// The returned batch holds every object that decoded and every error
    /// met; use [`NormalizedBatch::into_result`] to fail on errors.
    pub fn parse(&self, sources: &[InputSource]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::new();
        for source in sources {
            let mut parsed = self.parse_source(source);
            batch.append(&mut parsed);
        }
        log_summary(&batch, sources.len());
        batch
    }

    /// Same as [`DocumentParser::parse`], one worker per source.
    ///
    /// Results are merged in input order so the batch is identical.
    pub fn parse_parallel(&self, sources: &[InputSource]) -> NormalizedBatch {
        let parsed: Vec<NormalizedBatch> = sources
            .par_iter()
            .map(|source| self.parse_source(source))
            .collect();

        let mut batch = NormalizedBatch::new();
        for mut part in parsed {
            batch.append(&mut part);
        }
        log_summary(&batch, sources.len());
        batch
    }

    /// Parse a single in-memory text.
    pub fn parse_str(&self, name: &str, text: &str) -> NormalizedBatch {
        self.parse_source(&InputSource::from_text(name, text))
    }

    /// Parse one source into its own batch.
    pub fn parse_source(&self, source: &InputSource) -> NormalizedBatch {
        let mut batch = NormalizedBatch::new();

        for document in split_documents(&source.name, &source.bytes) {
            let RawDocument { bytes, location } = document;

            let Ok(text) = std::str::from_utf8(&bytes) else {
                log::warn!("{}: skipping document that is not valid UTF-8", location);
                batch.add_error(DecodeError::InvalidUtf8 { location });
                continue;
            };

            if is_blank(text) {
                continue;
            }
            let text = text.strip_suffix("\n---").unwrap_or(text);

            let value = match parse_value(text) {
                Ok(value) => value,
                Err(source) => {
                    log::warn!("{}: failed to parse YAML: {}", location, source);
                    batch.add_error(DecodeError::Detect { location, source });
                    continue;
                }
            };

            self.decode_value(&mut batch, value, location);
        }

        batch
    }

    fn decode_value(&self, batch: &mut NormalizedBatch, value: Value, location: FileLocation) {
        if value.is_null() {
            return;
        }

        let detected = match DetectKind::deserialize(&value) {
            Ok(detected) => detected,
            Err(source) => {
                log::warn!("{}: failed to detect kind: {}", location, source);
                batch.add_error(DecodeError::Detect { location, source });
                return;
            }
        };

        if detected.api_version == "v1" && detected.kind == "List" {
            match serde_yaml::from_value::<ListItems>(value) {
                Ok(list) => {
                    log::trace!("{}: expanding List of {} items", location, list.items.len());
                    for item in list.items {
                        self.decode_value(batch, item, location.clone());
                    }
                }
                Err(source) => {
                    log::warn!("{}: failed to parse v1/List: {}", location, source);
                    batch.add_error(DecodeError::Decode {
                        location,
                        api_version: detected.api_version,
                        kind: detected.kind,
                        source,
                    });
                }
            }
            return;
        }

        let Some(decode) = self.scheme.lookup(&detected.api_version, &detected.kind) else {
            log::debug!(
                "{}: skipping unknown object {}/{}",
                location,
                detected.api_version,
                detected.kind
            );
            return;
        };

        if let Err(source) = decode(batch, value, location.clone()) {
            log::warn!(
                "{}: failed to parse {}/{}: {}",
                location,
                detected.api_version,
                detected.kind,
                source
            );
            batch.add_error(DecodeError::Decode {
                location,
                api_version: detected.api_version,
                kind: detected.kind,
                source,
            });
        }
    }
}

fn parse_value(text: &str) -> Result<Value, serde_yaml::Error> {
    let mut value: Value = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    Ok(value)
}

fn log_summary(batch: &NormalizedBatch, sources: usize) {
    log::info!(
        "Parsed {} objects from {} source(s), {} error(s)",
        batch.len(),
        sources,
        batch.errors().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceHolder;
    use proptest::prelude::*;

    const DEPLOYMENT: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
        - name: web
          image: web:1";

    #[test]
    fn test_split_single_document() {
        let docs = split_documents("a.yaml", b"kind: Pod\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].location, FileLocation::new("a.yaml", 1, 0));
    }

    #[test]
    fn test_split_tracks_lines_and_crlf() {
        let input = b"a: 1\r\nb: 2\r\n---\r\nc: 3\r\n---\r\nd: 4\r\n";
        let docs = split_documents("a.yaml", input);
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].bytes, b"a: 1\nb: 2");
        assert_eq!(docs[1].location.line, 4);
        assert_eq!(docs[1].bytes, b"c: 3");
        assert_eq!(docs[2].location.line, 6);
        assert_eq!(docs[2].location.document, 2);
    }

    #[test]
    fn test_separator_must_be_bare() {
        let docs = split_documents("a.yaml", b"a: 1\n--- # comment\nb: 2\n");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_blank_documents_are_skipped() {
        let text = format!("# leading comment\n---\n{}\n---\n\n---\n...\n", DEPLOYMENT);
        let batch = DocumentParser::default().parse_str("a.yaml", &text);
        assert_eq!(batch.len(), 1);
        assert!(!batch.has_errors());
        assert_eq!(batch.deployments().count(), 1);
    }

    #[test]
    fn test_leading_and_trailing_markers() {
        let text = format!("---\n{}\n---", DEPLOYMENT);
        let batch = DocumentParser::default().parse_str("a.yaml", &text);
        assert_eq!(batch.len(), 1);
        assert!(!batch.has_errors());
    }

    #[test]
    fn test_unknown_kinds_are_ignored() {
        let text = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cfg\ndata:\n  a: b\n";
        let batch = DocumentParser::default().parse_str("a.yaml", text);
        assert!(batch.is_empty());
        assert!(!batch.has_errors());
    }

    #[test]
    fn test_list_items_are_expanded() {
        let text = "apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: Service
    metadata:
      name: web
  - apiVersion: v1
    kind: List
    items:
      - apiVersion: v1
        kind: Pod
        metadata:
          name: nested
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: ignored
";
        let batch = DocumentParser::default().parse_str("list.yaml", text);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.services().count(), 1);
        assert_eq!(batch.pods().count(), 1);
        assert!(batch.metas().all(|m| m.location.line == 1));
    }

    #[test]
    fn test_decode_failure_is_recorded_and_parsing_continues() {
        let text = format!(
            "{}\n---\napiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: broken\nspec:\n  replicas: many\n---\napiVersion: v1\nkind: Service\nmetadata:\n  name: web\n",
            DEPLOYMENT
        );
        let batch = DocumentParser::default().parse_str("a.yaml", &text);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.errors().len(), 1);

        let error = &batch.errors()[0];
        assert_eq!(error.location().line, 15);
        assert!(matches!(error, DecodeError::Decode { kind, .. } if kind == "Deployment"));
        assert!(batch.into_result().is_err());
    }

    #[test]
    fn test_non_mapping_document_fails_detection() {
        let batch = DocumentParser::default().parse_str("a.yaml", "just a string\n");
        assert!(matches!(batch.errors(), [DecodeError::Detect { .. }]));
    }

    #[test]
    fn test_invalid_utf8() {
        let source = InputSource::new("bin.yaml", vec![0x6b, 0x3a, 0x20, 0xff, 0xfe]);
        let batch = DocumentParser::default().parse(&[source]);
        assert!(matches!(batch.errors(), [DecodeError::InvalidUtf8 { .. }]));
    }

    #[test]
    fn test_yaml_merge_keys() {
        let text = "apiVersion: v1
kind: Service
metadata: &meta
  name: web
  labels:
    app: web
spec:
  selector:
    <<: {app: web}
";
        let batch = DocumentParser::default().parse_str("a.yaml", text);
        assert!(!batch.has_errors());
        let service = batch.services().next().unwrap();
        assert_eq!(service.selector().get("app").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sources: Vec<InputSource> = (0..8)
            .map(|i| {
                InputSource::from_text(
                    format!("s{}.yaml", i),
                    &format!(
                        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p{}\n---\napiVersion: v1\nkind: Service\nmetadata:\n  name: s{}\n",
                        i, i
                    ),
                )
            })
            .collect();
        let parser = DocumentParser::default();
        let sequential: Vec<_> = parser.parse(&sources).metas().cloned().collect();
        let parallel: Vec<_> = parser.parse_parallel(&sources).metas().cloned().collect();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 16);
    }

    proptest! {
        #[test]
        fn prop_split_counts_and_lines(bodies in prop::collection::vec(
            prop::collection::vec("[a-z]{1,8}: [a-z0-9]{1,8}", 1..4),
            1..6,
        )) {
            let docs: Vec<String> = bodies.iter().map(|lines| lines.join("\n")).collect();
            let text = docs.join("\n---\n");
            let split = split_documents("p.yaml", text.as_bytes());

            prop_assert_eq!(split.len(), docs.len());
            let mut line = 1;
            for (i, (raw, body)) in split.iter().zip(&bodies).enumerate() {
                prop_assert_eq!(raw.location.line, line);
                prop_assert_eq!(raw.location.document, i);
                line += body.len() + 1;
            }
        }
    }
}
