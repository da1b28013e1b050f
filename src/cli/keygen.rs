//! Генерация пар ключей RSA и DSA

use colored::Colorize;

use crate::error::Result;
use crate::CryptoManager;

use super::status;

pub fn rsa(manager: &CryptoManager) -> Result<bool> {
    println!("{}", "Генерация пары ключей RSA...".cyan());

    let ok = manager.generate_rsa_keys();
    let paths = manager.key_paths();

    Ok(status(
        ok,
        &format!(
            "Пара ключей RSA создана ({}, {}).",
            paths.rsa_public.display(),
            paths.rsa_private.display()
        ),
        "Не удалось создать пару ключей RSA.",
    ))
}

pub fn dsa(manager: &CryptoManager) -> Result<bool> {
    println!(
        "{}",
        "Генерация параметров и пары ключей DSA (это займёт некоторое время)...".cyan()
    );

    let ok = manager.generate_dsa_keys();
    let paths = manager.key_paths();

    Ok(status(
        ok,
        &format!(
            "Пара ключей DSA создана ({}, {}).",
            paths.dsa_public.display(),
            paths.dsa_private.display()
        ),
        "Не удалось создать пару ключей DSA.",
    ))
}
