use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::KeyKind;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Недопустимый параметр: {0}")]
    Parameter(String),

    #[error("Ключ не найден: {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("Файл ключа повреждён или содержит ключ другого типа: {}", .0.display())]
    KeyCorrupt(PathBuf),

    #[error("Неподходящий ключ: ожидался {expected}, получен {actual}")]
    KeyMismatch { expected: KeyKind, actual: KeyKind },

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Неверная hex-кодировка: {0}")]
    InvalidEncoding(String),

    #[error("Подпись имеет неверный формат")]
    MalformedSignature,

    /// Carries no detail: every decryption failure must look the same
    #[error("Криптографическая операция не выполнена")]
    CryptoOperation,

    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}
