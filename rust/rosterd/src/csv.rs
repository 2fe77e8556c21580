use crate::error::RosterError;
use crate::model::{validate_fields, StudentRecord};

pub const CSV_HEADER: &str = "Name,RollNo,Course,Year,CGPA";
pub const EXPORT_FILE_NAME: &str = "students.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8";

const FIELDS_PER_ROW: usize = 5;

/// How a single CSV line is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    Simple,
    Quoted,
}

#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub records: Vec<StudentRecord>,
    pub accepted: usize,
    pub rows_total: usize,
    pub rejected: usize,
}

/// Writes the export format. `name` and `course` are always quoted but their
/// contents are written verbatim; an embedded `"` is not doubled.
pub fn encode(records: &[StudentRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "\"{}\",{},\"{}\",{},{}\n",
            r.name, r.roll_number, r.course, r.year, r.gpa
        ));
    }
    out
}

pub fn split_mode(line: &str) -> SplitMode {
    if line.contains('"') {
        SplitMode::Quoted
    } else {
        SplitMode::Simple
    }
}

pub fn split_simple(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

/// Quote-aware split. A field is quoted only when its first non-space
/// character is `"` and the quoted run is closed; then commas inside it do not
/// end the field, the surrounding quotes are dropped and `""` yields one `"`.
/// Any other `"` is kept as a literal character of an unquoted field.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut rest = line;
    loop {
        let (field, tail) = quoted_field(rest).unwrap_or_else(|| unquoted_field(rest));
        out.push(field);
        match tail {
            Some(t) => rest = t,
            None => break,
        }
    }
    out
}

fn unquoted_field(s: &str) -> (String, Option<&str>) {
    match s.find(',') {
        Some(i) => (s[..i].to_string(), Some(&s[i + 1..])),
        None => (s.to_string(), None),
    }
}

/// Text after the closing quote, up to the next comma, stays with the field.
fn quoted_field(s: &str) -> Option<(String, Option<&str>)> {
    let body = s.trim_start().strip_prefix('"')?;
    let mut value = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch != '"' {
            value.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, '"'))) {
            value.push('"');
            chars.next();
            continue;
        }
        let (trailing, tail) = unquoted_field(&body[i + 1..]);
        value.push_str(&trailing);
        return Some((value, tail));
    }
    None
}

pub fn split_line(line: &str) -> Vec<String> {
    match split_mode(line) {
        SplitMode::Simple => split_simple(line),
        SplitMode::Quoted => split_quoted(line),
    }
}

/// A line is a candidate when it has at least five fields and the first five
/// validate. Anything after the fifth field is ignored.
pub fn parse_line(line: &str) -> Option<StudentRecord> {
    let fields = split_line(line);
    if fields.len() < FIELDS_PER_ROW {
        return None;
    }
    validate_fields(&fields[0], &fields[1], &fields[2], &fields[3], &fields[4]).ok()
}

fn is_header(line: &str) -> bool {
    line.to_lowercase().contains("name")
}

pub fn decode(text: &str) -> Decoded {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>();

    let skip = match lines.first() {
        Some(first) if is_header(first) => 1,
        _ => 0,
    };

    let mut decoded = Decoded::default();
    for line in lines.into_iter().skip(skip) {
        decoded.rows_total += 1;
        match parse_line(line) {
            Some(record) => decoded.records.push(record),
            None => decoded.rejected += 1,
        }
    }
    decoded.accepted = decoded.records.len();
    tracing::debug!(
        rows = decoded.rows_total,
        accepted = decoded.accepted,
        rejected = decoded.rejected,
        "decoded csv text"
    );
    decoded
}

/// Absent input has nothing to split into lines.
pub fn decode_input(text: Option<&str>) -> Result<Decoded, RosterError> {
    text.map(decode)
        .ok_or_else(|| RosterError::ParseFailure("no CSV text supplied".to_string()))
}

pub fn decode_bytes(bytes: &[u8]) -> Result<Decoded, RosterError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| RosterError::ParseFailure(format!("file is not UTF-8 text: {e}")))?;
    Ok(decode(text))
}
