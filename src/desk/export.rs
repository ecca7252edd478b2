//! Spreadsheet export of the item collection.

use std::io::Write;

use serde::Serialize;

use super::domain::Item;

/// CSV row mirroring the stored record, with a header from the field names.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    category: &'static str,
    date_found: String,
    location: &'a str,
    contact: &'a str,
    estimated_value: f64,
    perishable: bool,
    status: &'static str,
    created_at: String,
}

impl<'a> From<&'a Item> for ExportRow<'a> {
    fn from(item: &'a Item) -> Self {
        let details = item.details();
        Self {
            id: item.id().as_str(),
            name: &details.name,
            description: &details.description,
            category: details.category.label(),
            date_found: details.date_found.format("%Y-%m-%d").to_string(),
            location: &details.location,
            contact: &details.contact,
            estimated_value: details.estimated_value,
            perishable: details.perishable,
            status: item.status().label(),
            created_at: item.created_at().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// Write `items` as CSV and return the number of rows written.
pub fn write_csv<'a, W, I>(writer: W, items: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Item>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for item in items {
        csv_writer.serialize(ExportRow::from(item))?;
        rows += 1;
    }
    csv_writer.flush()?;
    Ok(rows)
}
