use crate::model::{display_gpa, StudentRecord};

/// Case-insensitive substring match over name, course and the roll number's
/// decimal text. An empty query keeps everything.
pub fn filter<'a>(records: &'a [StudentRecord], query: &str) -> Vec<&'a StudentRecord> {
    let q = query.to_lowercase();
    records.iter().filter(|r| is_match(r, &q)).collect()
}

fn is_match(r: &StudentRecord, q: &str) -> bool {
    r.name.to_lowercase().contains(q)
        || r.course.to_lowercase().contains(q)
        || r.roll_number.to_string().contains(q)
}

const RULE: &str = "---------------------------------------------------------------------";

/// Fixed-width text table, one row per record.
pub fn render_table(records: &[&StudentRecord]) -> String {
    if records.is_empty() {
        return "No records available.\n".to_string();
    }
    let mut out = format!(
        "{:<20} {:<10} {:<20} {:<6} {:<6}\n{}\n",
        "Name", "RollNo", "Course", "Year", "CGPA", RULE
    );
    for r in records {
        out.push_str(&format!(
            "{:<20} {:<10} {:<20} {:<6} {}\n",
            r.name,
            r.roll_number,
            r.course,
            r.year,
            display_gpa(r.gpa)
        ));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}
