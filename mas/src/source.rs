//! Segment records and the source splitter feeding the two passes.

use once_cell::sync::Lazy;
use regex::Regex;

use arch::field::MachineCode;

use crate::error::Error;
use crate::lex;

/// One `.text` line. `words` holds the encoded machine code; more than
/// one entry only after macro expansion or a `.text N` reservation.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub assembly: String,
    pub file: String,
    pub line: usize,
    pub address: u32,
    pub done: bool,
    pub words: Vec<MachineCode>,
}

impl Instruction {
    fn new(file: &str, line: usize, assembly: &str) -> Self {
        Self {
            assembly: assembly.to_string(),
            file: file.to_string(),
            line,
            address: 0,
            done: false,
            words: vec![],
        }
    }
}

/// One `.data` line, serialized little-endian into `bytes`.
#[derive(Debug, Clone)]
pub struct Data {
    pub assembly: String,
    pub file: String,
    pub line: usize,
    pub address: u32,
    pub done: bool,
    pub bytes: Vec<u8>,
}

impl Data {
    fn new(file: &str, line: usize, assembly: &str) -> Self {
        Self {
            assembly: assembly.to_string(),
            file: file.to_string(),
            line,
            address: 0,
            done: false,
            bytes: vec![],
        }
    }
}

static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\.(data|text)\b(?:\s+(\S+))?").unwrap());

enum State {
    Global,
    Text,
    Data,
}

/// Splits a source file into its instruction and data record lists.
///
/// `.text [N]` / `.data [N]` switch segments; the optional `N` reserves
/// zeroed space as an already-done record. Segments may be re-entered;
/// records keep source order. A non-blank line before the first segment
/// directive is fatal.
pub fn split(file: &str, src: &str) -> Result<(Vec<Instruction>, Vec<Data>), Error> {
    let mut text = vec![];
    let mut data = vec![];
    let mut state = State::Global;

    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let code = raw.split('#').next().unwrap_or("").trim_end();

        if let Some(caps) = SEGMENT.captures(code) {
            let is_data = caps[1].eq_ignore_ascii_case("data");
            if let Some(size) = caps.get(2) {
                let size = size.as_str();
                if !lex::is_positive(size) {
                    return Err(Error::ExpectPositive(size.to_string()));
                }
                let size = lex::to_unumber(size, true)? as usize;
                if is_data {
                    let mut record = Data::new(file, line, code);
                    record.bytes = vec![0; size];
                    record.done = true;
                    data.push(record);
                } else {
                    if size % 4 != 0 {
                        return Err(Error::TextAlign {
                            file: file.to_string(),
                            line,
                        });
                    }
                    let mut record = Instruction::new(file, line, code);
                    record.words = vec![0; size / 4];
                    record.done = true;
                    text.push(record);
                }
            }
            state = if is_data { State::Data } else { State::Text };
            continue;
        }

        match state {
            State::Global => {
                if !code.trim().is_empty() {
                    return Err(Error::NeedSegment {
                        file: file.to_string(),
                        line,
                    });
                }
            }
            State::Text => text.push(Instruction::new(file, line, code)),
            State::Data => data.push(Data::new(file, line, code)),
        }
    }
    Ok((text, data))
}
