use crate::cli::MergeArgs;
use crate::commands::ensure_parent;
use crate::error::{CliError, Result};
use pbxscreen::core::io::table::concatenate;
use tracing::info;

pub fn run(args: MergeArgs) -> Result<()> {
    if let Some(missing) = args.inputs.iter().find(|p| !p.exists()) {
        return Err(CliError::Argument(format!(
            "Input table does not exist: {}",
            missing.display()
        )));
    }
    if args.inputs.contains(&args.output) {
        return Err(CliError::Argument(format!(
            "Output {} is also an input",
            args.output.display()
        )));
    }

    ensure_parent(&args.output)?;
    let rows = concatenate(&args.inputs, &args.output)?;
    info!(
        "Merged {} table(s) into {:?} ({} rows)",
        args.inputs.len(),
        args.output,
        rows
    );
    println!(
        "Merged {} row(s) from {} table(s) into {}",
        rows,
        args.inputs.len(),
        args.output.display()
    );
    Ok(())
}
