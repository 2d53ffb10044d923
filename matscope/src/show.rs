//! Load a MAT file and print its contents.

use anyhow::{Context, Result};

use matscope_rs::Inspector;

use crate::cli::Args;
use crate::output;

/// Run the listing.
pub fn run(args: &Args) -> Result<()> {
    log::debug!("opening MAT file: {}", args.input.display());

    let file = matscope_rs::load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    output::print_header(&format!(
        "Variables in '{}' ({}):",
        args.input.display(),
        file.version().label()
    ));
    println!();

    let count = file.variable_names().count();
    if count == 0 {
        output::print_warning("No variables found in MAT file");
    }

    let inspector = Inspector::new(args.inspect_options());
    for line in inspector.render_file(&file) {
        println!("{}", line);
    }

    println!();
    println!("{}", output::plural(count, "variable"));
    Ok(())
}
