use chrono::Utc;
use polars::prelude::*;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Render the markdown summary document for one run: the statistics table followed by the
/// failures table, each under its own heading.
pub(crate) fn summary_document(base_name: &str, stats: &DataFrame, failures: &DataFrame) -> String {
    let mut document = format!("# Load Test Report: {base_name}\n\n");
    document.push_str(&format!(
        "Generated at {} UTC\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));

    document.push_str("## Summary Statistics\n\n");
    document.push_str(&markdown_table(stats));
    document.push_str("\n\n## Failures\n\n");
    document.push_str(&markdown_table(failures));
    document.push('\n');

    document
}

pub(crate) fn markdown_table(frame: &DataFrame) -> String {
    let mut builder = Builder::default();

    builder.push_record(frame.get_column_names().iter().map(|name| name.to_string()));
    for row in 0..frame.height() {
        builder.push_record(
            frame
                .get_columns()
                .iter()
                .map(|column| cell(column.get(row).unwrap_or(AnyValue::Null))),
        );
    }

    builder.build().with(Style::markdown()).to_string()
}

fn cell(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keeps_column_order_and_rows() {
        let frame = df!(
            "Name" => ["/status", "/data"],
            "Request Count" => [100i64, 50],
        )
        .unwrap();

        let table = markdown_table(&frame);
        let mut lines = table.lines();

        assert_eq!(lines.next(), Some("| Name    | Request Count |"));
        assert_eq!(lines.next(), Some("|---------|---------------|"));
        assert_eq!(lines.next(), Some("| /status | 100           |"));
        assert_eq!(lines.next(), Some("| /data   | 50            |"));
    }

    #[test]
    fn empty_frame_still_renders_a_header() {
        let frame = df!("Method" => Vec::<String>::new()).unwrap();

        let table = markdown_table(&frame);

        assert!(table.contains("Method"));
    }

    #[test]
    fn document_contains_both_headings() {
        let stats = df!("Name" => ["/status"]).unwrap();
        let failures = df!("Error" => Vec::<String>::new()).unwrap();

        let document = summary_document("run1", &stats, &failures);

        assert!(document.starts_with("# Load Test Report: run1\n"));
        assert!(document.contains("## Summary Statistics\n"));
        assert!(document.contains("## Failures\n"));
    }
}
