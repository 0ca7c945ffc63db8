use arch::field::Overflow;
use arch::reg::RegError;
use color_print::ceprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} should be a number or a symbol.")]
    ExpectNumberOrSymbol(String),

    #[error("{0} should be a number.")]
    ExpectNumber(String),

    #[error("{0} should be a positive number.")]
    ExpectPositive(String),

    #[error(transparent)]
    Register(#[from] RegError),

    #[error("Unknown instruction: {0}.")]
    UnknownInstruction(String),

    #[error("Unknown data directive: {0}.")]
    UnknownDirective(String),

    #[error("Invalid operands ({0}).")]
    OperandError(String),

    #[error("Too many operands ({0}).")]
    TooManyOperands(String),

    #[error(transparent)]
    Field(#[from] Overflow),

    #[error("Number out of range: {0}.")]
    NumberOutOfRange(String),

    #[error("Redefined symbol: {0}.")]
    RedefinedSymbol(String),

    #[error("Unknown symbol: {0}.")]
    UndefinedSymbol(String),

    #[error(".text size must be a multiple of 4 ({file}:{line}).")]
    TextAlign { file: String, line: usize },

    #[error("Need a .text or .data segment first ({file}:{line}).")]
    NeedSegment { file: String, line: usize },

    #[error("Unknown instruction format while resolving {0}.")]
    UnknownFormat(String),

    #[error("Stopped after {0} error(s); no output written.")]
    Aborted(usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Print the error with its source location and the offending line.
    pub fn diag(&self, file: &str, line: usize, raw: &str) {
        ceprintln!("<red,bold>error</>: {}", self);
        locus(file, line, raw);
    }
}

/// Diagnostic note tied to a source line.
pub fn note(msg: &str, file: &str, line: usize, raw: &str) {
    ceprintln!("<green,bold>note</>: {}", msg);
    locus(file, line, raw);
}

fn locus(file: &str, line: usize, raw: &str) {
    ceprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
    ceprintln!("      <blue>|</>");
    ceprintln!(" <blue>{:>4} |</> {}", line, raw);
    ceprintln!("      <blue>|</>");
}
