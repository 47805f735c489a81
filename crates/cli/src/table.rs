use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use screener_core::screen::ScreenReport;

fn number(v: f64) -> Cell {
    Cell::new(format!("{v:.2}")).set_alignment(CellAlignment::Right)
}

pub fn render_records(report: &ScreenReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Rank",
            "Symbol",
            "ReturnA (%)",
            "ReturnB (%)",
            "Volatility (%)",
            "Rating",
        ]);

    for row in &report.records {
        table.add_row(vec![
            Cell::new(row.rank).set_alignment(CellAlignment::Right),
            Cell::new(&row.record.ticker),
            number(row.record.return_a),
            number(row.record.return_b),
            number(row.record.volatility),
            number(row.record.rating),
        ]);
    }

    table.to_string()
}

pub fn render_failures(report: &ScreenReport) -> Option<String> {
    if report.failures.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Symbol", "Error"]);
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(&failure.ticker),
            Cell::new(failure.error.to_string()),
        ]);
    }
    Some(table.to_string())
}
