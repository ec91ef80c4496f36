use colored::Colorize;
use std::fmt;

pub fn info(message: impl fmt::Display) {
    println!("{} {}", "[i]".blue(), message);
}

pub fn success(message: impl fmt::Display) {
    println!("{} {}", "[✓]".green(), message);
}

pub fn warning(message: impl fmt::Display) {
    println!("{} {}", "[!]".yellow(), message);
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{} {}", "[x]".red(), message);
}

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title).bold());
}

/// Plain line, used for tabular listing output.
pub fn line(message: impl fmt::Display) {
    println!("{}", message);
}

/// Amount colored by sign: overspends show in red.
pub fn signed_amount(symbol: &str, value: f64) -> String {
    let rendered = format!("{}{:.2}", symbol, value.abs());
    if value < 0.0 {
        format!("-{}", rendered).red().to_string()
    } else {
        rendered.green().to_string()
    }
}
