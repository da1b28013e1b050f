//! Подпись файлов и проверка подписей

use std::path::Path;

use colored::Colorize;

use crate::config::write_file;
use crate::error::Result;
use crate::CryptoManager;

use super::{failure, read_signature_file, status, success};

/// Имя файла подписи по умолчанию
pub const DEFAULT_SIGNATURE_FILE: &str = "signature.sig";

/// Подписать файл; при `save_to` записать hex-подпись в этот файл
pub fn sign(manager: &CryptoManager, input: &Path, save_to: Option<&Path>) -> Result<bool> {
    let (ok, signature_hex) = manager.sign_dsa(input);
    if !ok {
        return Ok(failure(
            "Подпись не создана. Проверьте, что приватный ключ существует.",
        ));
    }

    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", signature_hex);
    println!("{}", "─".repeat(60).dimmed());
    println!();

    match save_to {
        Some(path) => {
            write_file(path, signature_hex.as_bytes(), false)?;
            Ok(success(&format!(
                "Подпись создана и сохранена в {}.",
                path.display()
            )))
        }
        None => Ok(success("Подпись создана (в файл не сохранена).")),
    }
}

/// Проверить подпись из файла `signature_file` для файла `input`
pub fn verify(manager: &CryptoManager, input: &Path, signature_file: &Path) -> Result<bool> {
    let signature_hex = read_signature_file(signature_file)?;

    let valid = manager.verify_dsa(input, &signature_hex);

    Ok(status(
        valid,
        "Подпись действительна.",
        "Подпись НЕ действительна.",
    ))
}
