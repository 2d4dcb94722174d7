//! tabappend: append CSV, XLS and XLSX files into one table
//!
//! Reads every target file, tags each row with its source filename and writes
//! the combined result as `tabappend.<ext>` in the working directory.

use anyhow::Result;

fn main() -> Result<()> {
    tabappend::cli::run()
}
