//! CSV output for subnet rows.

use crate::models::SubnetInfo;

const CSV_HEADER: &str = "cidr,network,broadcast,first_host,last_host,usable_hosts,total_hosts,subnet_mask,wildcard_mask,prefix";

/// Quote a field when it contains a comma, quote or newline, doubling any
/// embedded quotes.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n']) {
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

/// Header line plus one line per row, in the order given.
pub fn subnet_rows_csv(rows: &[&SubnetInfo]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let fields = [
            row.cidr.to_string(),
            row.network.to_string(),
            row.broadcast.to_string(),
            row.first_host.to_string(),
            row.last_host.to_string(),
            row.usable_hosts.to_string(),
            row.total_hosts.to_string(),
            row.subnet_mask.to_string(),
            row.wildcard_mask.to_string(),
            row.prefix.to_string(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Print rows as CSV to stdout.
pub fn print_subnet_csv(rows: &[&SubnetInfo]) {
    log::info!("#Start print_subnet_csv() rows={}", rows.len());
    print!("{}", subnet_rows_csv(rows));
}
