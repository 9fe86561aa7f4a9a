//! Always-quoted delimited record encoding.

use std::io::{self, BufRead};

/// Field separator outside quotes.
pub const FIELD_DELIMITER: char = ',';
/// Field quote character. Never escaped.
pub const QUOTE: char = '"';

/// Encodes fields as `"f1","f2",...`.
pub fn encode_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            line.push(FIELD_DELIMITER);
        }
        line.push(QUOTE);
        line.push_str(field.as_ref());
        line.push(QUOTE);
    }
    line
}

/// Decodes one line into its fields.
///
/// Quote characters toggle quoted mode and are dropped. A delimiter outside
/// quotes closes the current field, even an empty one. End of line closes
/// the last field only if it has started (any character or quote seen), so
/// an empty line yields no fields and a trailing delimiter adds none.
/// Unbalanced quotes are not reported; the rest of the line is read as
/// quoted text.
pub fn decode_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;

    for ch in line.chars() {
        if ch == QUOTE {
            in_quotes = !in_quotes;
            started = true;
            continue;
        }
        if ch == FIELD_DELIMITER && !in_quotes {
            fields.push(std::mem::take(&mut current));
            started = false;
            continue;
        }
        current.push(ch);
        started = true;
    }

    if started {
        fields.push(current);
    }
    fields
}

/// Reads all lines from `reader`, stripping `\n` and a preceding `\r`.
pub fn read_record_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::{decode_record, encode_record, read_record_lines};
    use std::io::Cursor;

    #[test]
    fn encode_quotes_every_field() {
        assert_eq!(encode_record(&["7", "Groceries", "ada"]), r#""7","Groceries","ada""#);
        assert_eq!(encode_record::<&str>(&[]), "");
    }

    #[test]
    fn quoted_delimiter_survives_roundtrip() {
        let line = encode_record(&["a,b", "c"]);
        assert_eq!(decode_record(&line), vec!["a,b", "c"]);
    }

    #[test]
    fn decode_handles_unquoted_and_empty_fields() {
        assert_eq!(decode_record("a,,b"), vec!["a", "", "b"]);
        assert_eq!(decode_record(r#""a","""#), vec!["a", ""]);
        assert_eq!(decode_record("a,"), vec!["a"]);
    }

    #[test]
    fn empty_line_has_no_fields() {
        assert!(decode_record("").is_empty());
    }

    #[test]
    fn unmatched_quote_is_best_effort() {
        assert_eq!(decode_record(r#""a,b"#), vec!["a,b"]);
    }

    #[test]
    fn embedded_quote_is_not_preserved() {
        let line = encode_record(&[r#"say "hi""#]);
        assert_ne!(decode_record(&line), vec![r#"say "hi""#]);
    }

    #[test]
    fn read_lines_strips_crlf_and_lf() {
        let input = Cursor::new("\"h\"\r\n\"a\"\n\"b\"");
        let lines = read_record_lines(input).unwrap();
        assert_eq!(lines, vec!["\"h\"", "\"a\"", "\"b\""]);
    }
}
