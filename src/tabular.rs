//! Permissive parser for the tabular feed files inside a bundle.
//!
//! GTFS text files are CSV with standard doubled-quote escaping, but real
//! feeds are sloppy: stray blank lines, rows shorter or longer than the
//! header, BOMs from spreadsheet exports. The parser tolerates all of it
//! and never fails; every field stays a string, and typed interpretation
//! of specific columns is the caller's concern.

/// One data row, as an ordered mapping from header column name to value.
///
/// Column order follows the header line. Rows shorter than the header are
/// padded with empty strings; fields past the header length are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    fields: Vec<(String, String)>,
}

impl CsvRecord {
    /// Value of the named column, if the header declared it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Columns and values in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse tabular text into records, one per non-empty data line.
///
/// The first non-empty line is the header. Blank lines are dropped
/// entirely rather than producing empty records. Never errors; malformed
/// rows degrade per the padding/truncation policy on [`CsvRecord`].
pub fn parse(text: &str) -> Vec<CsvRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.is_empty());

    let header = match lines.next() {
        Some(line) => split_fields(line),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let mut values = split_fields(line).into_iter();
            let fields = header
                .iter()
                .map(|column| (column.clone(), values.next().unwrap_or_default()))
                .collect();
            CsvRecord { fields }
        })
        .collect()
}

/// Split one line into fields, honoring quotes.
///
/// A `"` toggles quoted state, except that `""` inside quotes decodes to
/// one literal quote. A `,` outside quotes ends the field. Everything
/// else, surrounding whitespace included, is kept verbatim.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            other => field.push(other),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> CsvRecord {
        CsvRecord {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn splits_plain_fields() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        assert_eq!(split_fields(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn doubled_quote_decodes_to_literal_quote() {
        assert_eq!(split_fields(r#"a,"b""c",d"#), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert_eq!(split_fields("a , b"), vec!["a ", " b"]);
    }

    #[test]
    fn trailing_comma_yields_empty_final_field() {
        assert_eq!(split_fields("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn short_row_pads_missing_trailing_columns() {
        let records = parse("a,b,c\nx,y\n");
        assert_eq!(records, vec![record(&[("a", "x"), ("b", "y"), ("c", "")])]);
    }

    #[test]
    fn long_row_drops_extra_fields() {
        let records = parse("a,b,c\nx,y,z,w\n");
        assert_eq!(records, vec![record(&[("a", "x"), ("b", "y"), ("c", "z")])]);
    }

    #[test]
    fn blank_lines_are_dropped_not_empty_records() {
        let records = parse("a,b\n\nx,y\n\n\nu,v\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("a"), Some("x"));
        assert_eq!(records[1].get("b"), Some("v"));
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let records = parse("a,b\r\nx,y\r\n");
        assert_eq!(records, vec![record(&[("a", "x"), ("b", "y")])]);
    }

    #[test]
    fn leading_bom_is_stripped_from_first_header_column() {
        let records = parse("\u{feff}stop_id,stop_name\nS1,Central\n");
        assert_eq!(records[0].get("stop_id"), Some("S1"));
    }

    #[test]
    fn quoted_header_names_may_contain_commas() {
        let records = parse("\"name, long\",id\nCentral,S1\n");
        assert_eq!(records[0].get("name, long"), Some("Central"));
        assert_eq!(records[0].get("id"), Some("S1"));
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn header_only_input_yields_no_records() {
        assert!(parse("a,b,c\n").is_empty());
    }

    #[test]
    fn round_trips_simple_records() {
        let text = "service_id,monday\nS1,1\nS2,0\n";
        let records = parse(text);
        let serialized: String = std::iter::once("service_id,monday".to_string())
            .chain(records.iter().map(|r| {
                r.iter()
                    .map(|(_, v)| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }))
            .map(|line| line + "\n")
            .collect();
        assert_eq!(serialized, text);
    }

    #[test]
    fn calendar_scenario() {
        let records = parse("service_id,monday\nS1,1\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("service_id"), Some("S1"));
        assert_eq!(records[0].get("monday"), Some("1"));
    }
}
