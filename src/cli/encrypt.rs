//! Шифрование и расшифровка файлов

use std::path::Path;

use crate::error::Result;
use crate::CryptoManager;

use super::status;

/// Имя выходного файла по умолчанию для `encrypt`
pub const DEFAULT_ENCRYPTED_FILE: &str = "encrypted.bin";

/// Имя выходного файла по умолчанию для `decrypt`
pub const DEFAULT_DECRYPTED_FILE: &str = "decrypted.txt";

pub fn encrypt(manager: &CryptoManager, input: &Path, output: &Path) -> Result<bool> {
    let ok = manager.encrypt_rsa(input, output);

    Ok(status(
        ok,
        &format!("Файл зашифрован: {}", output.display()),
        "Шифрование не выполнено. Проверьте, что публичный ключ существует.",
    ))
}

pub fn decrypt(manager: &CryptoManager, input: &Path, output: &Path) -> Result<bool> {
    let ok = manager.decrypt_rsa(input, output);

    Ok(status(
        ok,
        &format!("Файл расшифрован: {}", output.display()),
        "Расшифровка не выполнена. Проверьте, что приватный ключ существует и файл не повреждён.",
    ))
}
