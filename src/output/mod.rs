//! Output formatting for subnet data.
//!
//! - [`csv`] - CSV export of subnet rows
//! - [`terminal`] - indented tree view with colours

mod csv;
mod terminal;

pub use csv::{escape_csv_field, print_subnet_csv, subnet_rows_csv};
pub use terminal::{print_tree, tree_line};
