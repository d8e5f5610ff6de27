//! Terminal output. The only place the CLI writes to stdout or stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use serde_json::Value;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

pub fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

pub fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

pub fn line(text: &str) {
    println!("  {text}");
}

pub fn blank() {
    println!();
}

pub fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

pub fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

/// Print an accent swatch using a 24-bit background escape.
pub fn swatch(label: &str, hex: &str) {
    let rgb = hex.strip_prefix('#').and_then(|h| {
        let channel = |i: usize| h.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
        Some((channel(0)?, channel(2)?, channel(4)?))
    });
    match rgb {
        Some((r, g, b)) => {
            println!("  {DIM}{label:<20}{RESET} \x1b[48;2;{r};{g};{b}m      {RESET} {WHITE}{hex}{RESET}");
        }
        None => kv_line(label, hex),
    }
}

pub fn print_json(value: &Value) {
    if value.is_null() {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to format JSON: {e}"),
    }
}

pub fn error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("  {RED}{BOLD}✗ Error:{RESET} {err:#}");
    eprintln!();
}
