use anyhow::{bail, Context, Result};
use hcrule::args::Args;
use hcrule::opcode::OpcodeTable;
use hcrule::operands::first_and_rest;
use hcrule::operations::calculate;
use is_terminal::IsTerminal;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = hcrule::args::parsed();
    init_logging(args.quiet);

    let Some(op) = args.op else {
        return list_opcodes(io::stdout().lock());
    };
    let (first, rest) = match first_and_rest(&args.files)? {
        None => return Ok(()), // No operands implies an empty result
        Some((first, others)) => (first, others),
    };

    let mut problems = first.report();
    let rest = rest.map(|operand| {
        let operand = operand?;
        problems += operand.report();
        Ok::<_, anyhow::Error>(operand)
    });
    let style = hcrule::format::OutputStyle { layout: first.layout(), ..args.output_style() };
    let programs = &first.parsed().programs;

    if let Some(path) = &args.output {
        // The output file may also be an operand, so read them all before truncating it
        let rest = rest.collect::<Result<Vec<_>>>()?;
        let file = File::create(path)
            .with_context(|| format!("Can't create output file: {}", path.display()))?;
        calculate(op, programs, rest.into_iter().map(Ok), BufWriter::new(file), &style)?;
    } else if io::stdout().is_terminal() {
        calculate(op, programs, rest, io::stdout().lock(), &style)?;
    } else {
        calculate(op, programs, rest, BufWriter::new(io::stdout().lock()), &style)?;
    }

    check_strict(&args, problems)
}

// Logs go to standard error, so they never mix with rules written to stdout.
fn init_logging(quiet: bool) {
    let default = if quiet { "hcrule=error" } else { "hcrule=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn list_opcodes(mut out: impl Write) -> Result<()> {
    for opcode in OpcodeTable::hashcat() {
        writeln!(out, "{}  {}  {}", opcode.symbol, opcode.arity, opcode.name)?;
    }
    out.flush()?;
    Ok(())
}

fn check_strict(args: &Args, problems: usize) -> Result<()> {
    if args.strict && problems > 0 {
        bail!("{problems} invalid or incomplete rule(s) skipped");
    }
    Ok(())
}
