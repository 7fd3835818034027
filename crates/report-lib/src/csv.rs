//! CSV report output

use crate::models::ReportRow;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column headers of the report
pub const HEADER: [&str; 7] = [
    "Namespace",
    "Pod Name",
    "Container Name",
    "CPU Request (m)",
    "CPU Limit (m)",
    "Memory Request (Mi)",
    "Memory Limit (Mi)",
];

/// Minimal CSV record writer: `,` separated, `\n` terminated
pub struct CsvWriter<W: Write> {
    inner: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one record, quoting fields as needed
    pub fn write_record<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.inner.write_all(b",")?;
            }
            self.inner.write_all(escape_field(field.as_ref()).as_bytes())?;
        }
        self.inner.write_all(b"\n")
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_record(HEADER)
    }

    pub fn write_row(&mut self, row: &ReportRow) -> io::Result<()> {
        let cpu_request = format_value(row.cpu_request_m);
        let cpu_limit = format_value(row.cpu_limit_m);
        let memory_request = format_value(row.memory_request_mi);
        let memory_limit = format_value(row.memory_limit_mi);

        self.write_record([
            row.namespace.as_str(),
            row.pod_name.as_str(),
            row.container_name.as_str(),
            cpu_request.as_str(),
            cpu_limit.as_str(),
            memory_request.as_str(),
            memory_limit.as_str(),
        ])
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Format a normalized value as a plain decimal.
///
/// Uses the shortest representation that round-trips, never an exponent:
/// `250.0` becomes `"250"`, `1.5` stays `"1.5"`.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

fn needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    if field == r"\." {
        return true;
    }
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        return true;
    }
    field.starts_with(char::is_whitespace)
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if needs_quotes(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write the header and every row, then flush
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> io::Result<()> {
    let mut csv = CsvWriter::new(writer);
    csv.write_header()?;
    for row in rows {
        csv.write_row(row)?;
    }
    csv.flush()
}

/// Create (or truncate) `path` and write the report into it
pub fn write_report_file(path: &Path, rows: &[ReportRow]) -> io::Result<()> {
    let file = File::create(path)?;
    write_report(BufWriter::new(file), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(namespace: &str, pod: &str, container: &str, values: [f64; 4]) -> ReportRow {
        ReportRow {
            namespace: namespace.to_string(),
            pod_name: pod.to_string(),
            container_name: container.to_string(),
            cpu_request_m: values[0],
            cpu_limit_m: values[1],
            memory_request_mi: values[2],
            memory_limit_mi: values[3],
        }
    }

    fn render(rows: &[ReportRow]) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(
            render(&[]),
            "Namespace,Pod Name,Container Name,CPU Request (m),CPU Limit (m),Memory Request (Mi),Memory Limit (Mi)\n"
        );
    }

    #[test]
    fn test_rows_follow_header() {
        let output = render(&[
            row("ns", "podname", "containername", [100.0, 500.0, 256.0, 512.0]),
            row("kube-system", "dns", "coredns", [100.0, 0.0, 70.0, 170.0]),
        ]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "ns,podname,containername,100,500,256,512");
        assert_eq!(lines[2], "kube-system,dns,coredns,100,0,70,170");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(250.0), "250");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(1048576.0), "1048576");
        assert_eq!(format_value(0.1), "0.1");
        assert_eq!(format_value(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field(""), "");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field(" leading"), "\" leading\"");
        assert_eq!(escape_field(r"\."), "\"\\.\"");
        assert_eq!(escape_field("trailing "), "trailing ");
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report_file(&path, &[row("ns", "p", "c", [1.0, 2.0, 3.0, 4.0])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Namespace,"));
        assert!(content.ends_with("ns,p,c,1,2,3,4\n"));
    }

    #[test]
    fn test_write_report_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");

        assert!(write_report_file(&path, &[]).is_err());
    }
}
