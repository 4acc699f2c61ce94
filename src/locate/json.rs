//! JSON variant of the structured locator.
//!
//! A small recursive-descent scanner over the raw bytes. The serde stack is
//! the wrong tool here: it hands out decoded values, not the byte span each
//! token occupied, and re-serializing would reformat a developer-owned file.
//! So this walks the document itself, composing object keys into the current
//! path and recording spans for requested paths.
//!
//! For string values the recorded span is the *inner* text between the
//! quotes (escapes left as written), so a replacement at the span never
//! disturbs the surrounding quote characters. Values inside arrays are not
//! addressable: an array pushes a sentinel segment that matches no path.

use crate::locate::{DocumentPath, Located, LocateError, LocatedValue};

/// Locate the values at `wanted` paths in a JSON document.
///
/// First occurrence wins; a repeated key at an already-matched path is an
/// [`LocateError::AmbiguousPath`]. Paths absent from the document are
/// absent from the returned map.
pub fn locate(document: &str, wanted: &[DocumentPath]) -> Result<Located, LocateError> {
    let (body, bias) = super::strip_bom(document);
    let mut scanner = Scanner {
        bytes: body.as_bytes(),
        pos: 0,
        bias,
    };
    let mut found = Located::new();
    let mut stack: Vec<String> = Vec::new();

    scanner.skip_whitespace();
    scanner.value(&mut stack, wanted, &mut found)?;
    scanner.skip_whitespace();
    if scanner.pos != scanner.bytes.len() {
        return Err(scanner.malformed("trailing content after document"));
    }

    Ok(found)
}

/// Path segment pushed while inside an array. Requested paths are validated
/// to contain no empty segments, so this can never match one.
const ARRAY_SEGMENT: &str = "";

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Byte length of a stripped leading BOM, added back into every offset
    /// reported to the caller.
    bias: usize,
}

impl Scanner<'_> {
    fn malformed(&self, message: &str) -> LocateError {
        LocateError::Malformed {
            format: "JSON",
            offset: self.pos + self.bias,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), LocateError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.malformed(&format!("expected '{}'", byte as char)))
        }
    }

    /// Scan one value. Scalars at a requested path are recorded.
    fn value(
        &mut self,
        stack: &mut Vec<String>,
        wanted: &[DocumentPath],
        found: &mut Located,
    ) -> Result<(), LocateError> {
        match self.peek() {
            Some(b'{') => self.object(stack, wanted, found),
            Some(b'[') => self.array(stack, wanted, found),
            Some(b'"') => {
                let (text, end) = self.string()?;
                self.record(stack, wanted, found, text, end)
            }
            Some(b) if b == b'-' || b.is_ascii_digit() || b == b't' || b == b'f' || b == b'n' => {
                let (text, end) = self.literal()?;
                self.record(stack, wanted, found, text, end)
            }
            Some(_) => Err(self.malformed("unexpected character")),
            None => Err(self.malformed("unexpected end of document")),
        }
    }

    fn object(
        &mut self,
        stack: &mut Vec<String>,
        wanted: &[DocumentPath],
        found: &mut Located,
    ) -> Result<(), LocateError> {
        self.expect(b'{')?;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(());
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.malformed("expected object key"));
            }
            let (key, _) = self.string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();

            stack.push(key);
            self.value(stack, wanted, found)?;
            stack.pop();

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.malformed("expected ',' or '}' in object")),
            }
        }
    }

    fn array(
        &mut self,
        stack: &mut Vec<String>,
        wanted: &[DocumentPath],
        found: &mut Located,
    ) -> Result<(), LocateError> {
        self.expect(b'[')?;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }

        loop {
            self.skip_whitespace();
            stack.push(ARRAY_SEGMENT.to_string());
            self.value(stack, wanted, found)?;
            stack.pop();

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b']') => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.malformed("expected ',' or ']' in array")),
            }
        }
    }

    /// Scan a string token. Returns the raw inner text (escapes left as
    /// written) and the byte offset of the closing quote, i.e. one past the
    /// last byte of the inner text.
    fn string(&mut self) -> Result<(String, usize), LocateError> {
        self.expect(b'"')?;
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'"' => {
                    let end = self.pos;
                    let text = String::from_utf8_lossy(&self.bytes[start..end]).into_owned();
                    self.pos += 1;
                    return Ok((text, end));
                }
                b'\\' => {
                    // Skip the escaped character; \uXXXX hex never contains
                    // a quote so skipping one byte is sufficient.
                    self.pos += 2;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = start;
        Err(self.malformed("unterminated string"))
    }

    /// Scan a number, `true`, `false`, or `null` token. Returns the raw
    /// token text and the byte offset one past its last byte.
    fn literal(&mut self) -> Result<(String, usize), LocateError> {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'+' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.malformed("expected value"));
        }
        let text = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        if text != "true" && text != "false" && text != "null" && !is_json_number(&text) {
            self.pos = start;
            return Err(self.malformed(&format!("invalid literal '{text}'")));
        }
        Ok((text, self.pos))
    }

    fn record(
        &self,
        stack: &[String],
        wanted: &[DocumentPath],
        found: &mut Located,
        text: String,
        end: usize,
    ) -> Result<(), LocateError> {
        let Some(path) = wanted.iter().find(|p| p.matches(stack)) else {
            return Ok(());
        };
        if found.contains_key(path) {
            return Err(LocateError::AmbiguousPath {
                path: path.to_string(),
            });
        }
        found.insert(
            path.clone(),
            LocatedValue {
                path: path.clone(),
                text,
                end: end + self.bias,
            },
        );
        Ok(())
    }
}

/// JSON number grammar: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn is_json_number(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    // At least one digit, no leading zeros.
    if i == int_start || (i - int_start > 1 && bytes[int_start] == b'0') {
        return false;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = r#"{
  "name": "example-app",
  "version": "1.4.0-beta.2",
  "scripts": {
    "build": "tsc"
  },
  "keywords": ["cli", "versioning"],
  "dependencies": {
    "left-pad": "1.3.0"
  }
}
"#;

    fn paths(raw: &[&str]) -> Vec<DocumentPath> {
        raw.iter().map(|p| DocumentPath::parse(p).unwrap()).collect()
    }

    #[test]
    fn locates_top_level_version_span_exactly() {
        let wanted = paths(&["/version", "/name"]);
        let found = locate(PACKAGE, &wanted).unwrap();

        let version = &found[&wanted[0]];
        assert_eq!(version.text, "1.4.0-beta.2");
        assert_eq!(
            &PACKAGE.as_bytes()[version.begin()..version.end],
            "1.4.0-beta.2".as_bytes()
        );
        assert_eq!(found[&wanted[1]].text, "example-app");
    }

    #[test]
    fn nested_keys_do_not_shadow_top_level() {
        // dependencies.left-pad has a version-shaped value but a different path
        let wanted = paths(&["/dependencies/left-pad"]);
        let found = locate(PACKAGE, &wanted).unwrap();
        assert_eq!(found[&wanted[0]].text, "1.3.0");
    }

    #[test]
    fn missing_path_is_absent_not_an_error() {
        let doc = r#"{ "name": "no-version-here" }"#;
        let wanted = paths(&["/version", "/name"]);
        let found = locate(doc, &wanted).unwrap();

        assert_eq!(found.len(), 1);
        assert!(!found.contains_key(&wanted[0]));
    }

    #[test]
    fn array_values_are_not_addressable() {
        let doc = r#"{ "list": [{ "version": "7.7.7" }], "version": "1.0.0" }"#;
        let wanted = paths(&["/version"]);
        let found = locate(doc, &wanted).unwrap();
        assert_eq!(found[&wanted[0]].text, "1.0.0");
    }

    #[test]
    fn repeated_key_is_ambiguous() {
        let doc = r#"{ "version": "1.0.0", "version": "2.0.0" }"#;
        let wanted = paths(&["/version"]);
        let result = locate(doc, &wanted);
        assert!(matches!(result, Err(LocateError::AmbiguousPath { .. })));
    }

    #[test]
    fn malformed_document_is_rejected() {
        let wanted = paths(&["/version"]);
        assert!(matches!(
            locate(r#"{ "version": }"#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
        assert!(matches!(
            locate(r#"{ "version": "1.0.0" "#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
        assert!(matches!(
            locate(r#"{ "version": "1.0.0" } trailing"#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
    }

    #[test]
    fn bom_prefixed_document_keeps_spans_exact() {
        let doc = format!("\u{feff}{PACKAGE}");
        let wanted = paths(&["/version"]);
        let found = locate(&doc, &wanted).unwrap();
        let value = &found[&wanted[0]];

        assert_eq!(value.text, "1.4.0-beta.2");
        assert_eq!(
            &doc.as_bytes()[value.begin()..value.end],
            "1.4.0-beta.2".as_bytes()
        );
    }

    #[test]
    fn bare_words_are_not_literals() {
        let wanted = paths(&["/version"]);
        assert!(matches!(
            locate(r#"{ "version": truthy, "name": "x" }"#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
        assert!(matches!(
            locate(r#"{ "version": 1.2.3 }"#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
        assert!(matches!(
            locate(r#"{ "version": 01 }"#, &wanted),
            Err(LocateError::Malformed { .. })
        ));
    }

    #[test]
    fn number_grammar_matches_json() {
        for token in ["0", "-0", "42", "-17.5", "0.001", "1e10", "2.5E-3"] {
            assert!(is_json_number(token), "{token} should be a number");
        }
        for token in ["truthy", "nul", "01", "1.", ".5", "1e", "1.2.3", "-", "+1"] {
            assert!(!is_json_number(token), "{token} should be rejected");
        }
    }

    #[test]
    fn escaped_strings_keep_raw_text() {
        let doc = r#"{ "name": "a \"quoted\" name" }"#;
        let wanted = paths(&["/name"]);
        let found = locate(doc, &wanted).unwrap();
        let value = &found[&wanted[0]];

        assert_eq!(value.text, r#"a \"quoted\" name"#);
        assert_eq!(
            &doc.as_bytes()[value.begin()..value.end],
            r#"a \"quoted\" name"#.as_bytes()
        );
    }

    #[test]
    fn non_string_scalars_are_located() {
        let doc = r#"{ "count": 42, "flag": true }"#;
        let wanted = paths(&["/count", "/flag"]);
        let found = locate(doc, &wanted).unwrap();
        assert_eq!(found[&wanted[0]].text, "42");
        assert_eq!(found[&wanted[1]].text, "true");
    }
}
