//! Record formatting for the CSV sink and the `page` command.

use std::io::Write;

use furusato_core::models::config::OutputConfig;
use furusato_core::OutputRecord;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write records as CSV, one row per page.
pub fn write_csv<W: Write>(
    mut writer: W,
    records: &[OutputRecord],
    config: &OutputConfig,
) -> anyhow::Result<()> {
    if config.write_bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut wtr = csv::Writer::from_writer(writer);

    if config.write_header {
        wtr.write_record(OutputRecord::HEADERS)?;
    }

    for record in records {
        wtr.write_record(record.to_row())?;
    }

    wtr.flush()?;
    Ok(())
}

/// CSV as a string, without BOM.
pub fn format_csv(records: &[OutputRecord]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    let config = OutputConfig {
        write_bom: false,
        write_header: true,
    };
    write_csv(&mut buffer, records, &config)?;
    Ok(String::from_utf8(buffer)?)
}

/// Human-readable summary, one block per page.
pub fn format_text(records: &[OutputRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!("{} (page {})\n", record.document, record.page));
        output.push_str(&format!("  Municipality: {}\n", or_dash(&record.municipality)));
        output.push_str(&format!("  Date:         {}\n", or_dash(&record.date)));
        output.push_str(&format!("  Amount:       {}\n", or_dash(&record.amount)));
    }

    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
