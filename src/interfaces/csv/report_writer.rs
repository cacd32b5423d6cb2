use crate::domain::money::Money;
use crate::domain::transaction::ProcessedTransaction;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

const REPORT_HEADER: [&str; 3] = ["category", "total_sales", "avg_quantity"];

#[derive(Serialize)]
struct ReportRow<'a> {
    category: &'a str,
    total_sales: String,
    avg_quantity: f64,
}

impl<'a> From<&'a ProcessedTransaction> for ReportRow<'a> {
    fn from(row: &'a ProcessedTransaction) -> Self {
        let total_sales = Money::from_f64(row.total_sales)
            .map(|m| m.to_string())
            .unwrap_or_else(|| row.total_sales.to_string());
        Self {
            category: &row.category,
            total_sales,
            avg_quantity: row.avg_quantity,
        }
    }
}

/// Writes report rows sorted by category, as CSV or pretty-printed JSON.
pub struct ReportWriter<W: Write> {
    sink: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Writes `category,total_sales,avg_quantity` rows; sales are rounded to
    /// cents. The header is written even when there are no rows.
    pub fn write_csv(&mut self, rows: &[ProcessedTransaction]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.sink);
        writer.write_record(REPORT_HEADER)?;
        for row in sorted(rows) {
            writer.serialize(ReportRow::from(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the rows as a JSON array, amounts unrounded.
    pub fn write_json(&mut self, rows: &[ProcessedTransaction]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, &sorted(rows))?;
        writeln!(self.sink)?;
        Ok(())
    }
}

fn sorted(rows: &[ProcessedTransaction]) -> Vec<&ProcessedTransaction> {
    let mut sorted: Vec<_> = rows.iter().collect();
    sorted.sort_by(|a, b| a.category.cmp(&b.category));
    sorted
}
