//! Terminal output utilities.

use crate::models::SubnetInfo;
use colored::Colorize;

/// One tree row, indented two spaces per level below `root_prefix`.
pub fn tree_line(node: &SubnetInfo, root_prefix: u8) -> String {
    let depth = node.prefix.saturating_sub(root_prefix) as usize;
    format!(
        "{indent}{cidr:<18} {range:>33} {hosts:>12}",
        indent = "  ".repeat(depth),
        cidr = node.cidr.to_string(),
        range = format!("{} - {}", node.first_host, node.last_host),
        hosts = format!("{} hosts", node.usable_hosts),
    )
}

/// Print rows as an indented tree, leaves highlighted.
pub fn print_tree(rows: &[&SubnetInfo], root_prefix: u8) {
    for row in rows {
        let line = tree_line(row, root_prefix);
        if row.is_split() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line.green());
        }
    }
}
