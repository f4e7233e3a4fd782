use crate::models::HistoryRecord;

pub const HEADER: [&str; 4] = ["Title", "Author", "Item Number", "Checkedout Date"];

pub fn to_csv(items: &[HistoryRecord]) -> String {
    let mut csv = String::new();
    write_line(&mut csv, HEADER.map(Some));
    for item in items {
        write_line(
            &mut csv,
            [
                item.title.as_deref(),
                item.author.as_deref(),
                item.item_number.as_deref(),
                item.checkedout_date.as_deref(),
            ],
        );
    }
    csv
}

fn write_line(csv: &mut String, fields: [Option<&str>; 4]) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            csv.push(',');
        }
        // null columns are written as empty fields
        let field = field.unwrap_or_default();
        if field.contains([',', '"', '\r', '\n']) {
            csv.push('"');
            csv.push_str(&field.replace('"', "\"\""));
            csv.push('"');
        } else {
            csv.push_str(field);
        }
    }
    csv.push('\n');
}
