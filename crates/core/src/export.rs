//! CSV export helpers.
//!
//! The visitor and ticket report exports produce RFC 4180 style CSV:
//! fields containing commas, quotes, or newlines are quoted and embedded
//! quotes doubled. Small enough that a dedicated CSV crate is not worth
//! the dependency.

/// Escape a single CSV field.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join already-escaped-or-plain values into one CSV row (no trailing newline).
pub fn csv_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_field("hello"), "hello");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn commas_and_quotes_are_quoted() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn row_joins_and_escapes() {
        let row = csv_row(["Budi", "RSUD, Ward A", "081234567890"]);
        assert_eq!(row, "Budi,\"RSUD, Ward A\",081234567890");
    }
}
