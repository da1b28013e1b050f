//! Реализация CLI команд

pub mod encrypt;
pub mod keygen;
pub mod sign;

use std::fs;
use std::path::Path;

use colored::Colorize;

use crate::error::Result;

/// Напечатать итог операции: `success` при удаче, `failure` при ошибке
pub fn status(ok: bool, success: &str, failure: &str) -> bool {
    if ok {
        self::success(success)
    } else {
        self::failure(failure)
    }
}

/// Зелёная строка об успехе; всегда `true`
pub fn success(message: &str) -> bool {
    println!("{}", message.green());
    true
}

/// Красная строка об ошибке; всегда `false`
pub fn failure(message: &str) -> bool {
    eprintln!("{} {}", "Ошибка:".red().bold(), message);
    false
}

/// Прочитать hex-подпись из файла, без окружающих пробелов и переводов строки
pub fn read_signature_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim().to_string())
}
