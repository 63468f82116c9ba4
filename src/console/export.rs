use std::io::Write;

use chrono::NaiveDateTime;

use crate::domain::client::Client;
use crate::sheet::TEMPLATE_HEADERS;

pub const DEFAULT_EXPORT_PREFIX: &str = "clients";

/// `{prefix}_{yyyyMMddHHmm}.csv`
pub fn export_filename(prefix: &str, at: &NaiveDateTime) -> String {
    let prefix = match prefix.trim() {
        "" => DEFAULT_EXPORT_PREFIX,
        prefix => prefix,
    };
    format!("{prefix}_{}.csv", at.format("%Y%m%d%H%M"))
}

/// Writes `clients` as CSV in template column order.
pub fn write_clients<W: Write>(writer: W, clients: &[Client]) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TEMPLATE_HEADERS)?;
    for client in clients {
        let id = client.id.to_string();
        csv.write_record([
            id.as_str(),
            client.full_name.as_str(),
            client.display_name.as_str(),
            client.email.as_str(),
            client.details.as_str(),
            if client.active { "TRUE" } else { "FALSE" },
            client.location.as_str(),
            client.country.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
