mod assemble;
mod data;
mod error;
mod inst_i;
mod inst_j;
mod inst_r;
mod label;
mod lex;
mod macros;
mod output;
mod parser;
mod source;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_print::ceprintln;

use crate::assemble::Assembler;
use crate::error::Error;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Parser)]
#[clap(version, about = "MIPS32 assembler emitting .coe block-RAM images", help_template = HELP_TEMPLATE)]
struct Args {
    /// Input assembly file
    input: String,

    /// Output directory
    #[clap(default_value = "./")]
    output: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ceprintln!("<red,bold>error</>: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    println!("1. Read and split {}", args.input);
    let src =
        std::fs::read_to_string(&args.input).map_err(|e| Error::FileOpen(args.input.clone(), e))?;
    let (mut text, mut data) = source::split(&args.input, &src)?;
    println!("  - {} instruction line(s), {} data line(s)", text.len(), data.len());

    println!("2. Encode segments");
    let mut asm = Assembler::new();
    asm.pass1_data(&mut data);
    asm.pass1_text(&mut text);
    println!("  - found #{} symbols", asm.symbols.len());
    if asm.errors > 0 {
        return Err(Error::Aborted(asm.errors));
    }

    println!("3. Resolve symbols");
    asm.pass2(&mut text);
    if asm.errors > 0 {
        return Err(Error::Aborted(asm.errors));
    }

    println!("4. Write images");
    let dir = Path::new(&args.output);
    write_file(&dir.join("prgmip32.coe"), |out| {
        output::write_coe(out, &output::text_image(&text))
    })?;
    write_file(&dir.join("dmem32.coe"), |out| {
        output::write_coe(out, &output::data_image(&data))
    })?;
    write_file(&dir.join("details.txt"), |out| {
        output::write_listing(out, &text, &data)
    })?;
    println!("  - prgmip32.coe, dmem32.coe, details.txt");
    Ok(())
}

fn write_file(
    path: &Path,
    emit: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), Error> {
    let name = path.display().to_string();
    let file = File::create(path).map_err(|e| Error::FileCreate(name.clone(), e))?;
    let mut out = BufWriter::new(file);
    emit(&mut out).map_err(|e| Error::FileWrite(name.clone(), e))?;
    out.flush().map_err(|e| Error::FileWrite(name, e))
}
