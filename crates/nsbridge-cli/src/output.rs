use colored::Colorize;
use nsbridge_auth::AuthFailureKind;
use serde_json::Value;

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_auth_failure(kind: AuthFailureKind, message: &str) {
    eprintln!("{} {}: {}", "✗".yellow(), kind.as_str().yellow(), message);
}
