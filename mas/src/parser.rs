//! Line-level parsing: label extraction, mnemonic/operand splitting,
//! and instruction-format dispatch by mnemonic.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(\S+?)\s*:)?\s*([^#]*?)\s*(?:#.*)?$").unwrap());

static R_MNEMONIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i)(addu?|subu?|and|[xn]?or|sltu?|s(?:ll|rl|ra)v?|jr|multu?|divu?|m[tf]hi|m[tf]lo|jalr|break|syscall|eret)$",
    )
    .unwrap()
});

static I_MNEMONIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i)(addiu?|andi|x?ori|lui|l[bhw]u?|s[bhw]|beq|bne|sltiu?|m[ft]c0|b[gl][et]z|bgezal|bltzal)$",
    )
    .unwrap()
});

static J_MNEMONIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)(j|jal)$").unwrap());

static MACRO_MNEMONIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)(mov|push|pop|nop)$").unwrap());

/// Splits an optional `label:` prefix from a line and strips any
/// trailing comment. Returns the label (not yet uppercased) and the
/// remaining statement body.
pub fn split_label(line: &str) -> (Option<String>, String) {
    match LINE.captures(line) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map_or(String::new(), |m| m.as_str().to_string()),
        ),
        None => (None, String::new()),
    }
}

/// First token of a statement body.
pub fn mnemonic(body: &str) -> &str {
    body.split_whitespace().next().unwrap_or("")
}

/// Comma-separated operands after the mnemonic, trimmed.
pub fn operands(body: &str) -> Vec<String> {
    let rest = body.trim_start();
    let rest = match rest.find(char::is_whitespace) {
        Some(i) => rest[i..].trim(),
        None => "",
    };
    if rest.is_empty() {
        return vec![];
    }
    rest.split(',').map(|s| s.trim().to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R,
    I,
    J,
    Macro,
}

/// First-pass dispatch: format of a mnemonic, or `None` if unknown.
pub fn format_of(mnemonic: &str) -> Option<Format> {
    if R_MNEMONIC.is_match(mnemonic) {
        Some(Format::R)
    } else if I_MNEMONIC.is_match(mnemonic) {
        Some(Format::I)
    } else if J_MNEMONIC.is_match(mnemonic) {
        Some(Format::J)
    } else if MACRO_MNEMONIC.is_match(mnemonic) {
        Some(Format::Macro)
    } else {
        None
    }
}
