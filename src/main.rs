use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crypto_manager::cli::encrypt::{DEFAULT_DECRYPTED_FILE, DEFAULT_ENCRYPTED_FILE};
use crypto_manager::cli::sign::DEFAULT_SIGNATURE_FILE;
use crypto_manager::config::{Settings, DEFAULT_CONFIG_FILE};
use crypto_manager::{cli, CryptoManager, Result};

#[derive(Parser)]
#[command(name = "crypto-manager")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Шифрование файлов RSA и подпись файлов DSA", long_about = None)]
struct Cli {
    /// Файл настроек (размеры ключей, каталог ключей)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Каталог с файлами ключей (вместо key_dir из настроек)
    #[arg(long, global = true)]
    key_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Создать пару ключей RSA
    RsaKeygen,

    /// Зашифровать файл публичным ключом RSA
    Encrypt {
        /// Исходный файл
        input: PathBuf,
        /// Зашифрованный файл
        #[arg(default_value = DEFAULT_ENCRYPTED_FILE)]
        output: PathBuf,
    },

    /// Расшифровать файл приватным ключом RSA
    Decrypt {
        /// Зашифрованный файл
        input: PathBuf,
        /// Расшифрованный файл
        #[arg(default_value = DEFAULT_DECRYPTED_FILE)]
        output: PathBuf,
    },

    /// Создать пару ключей DSA
    DsaKeygen,

    /// Подписать файл приватным ключом DSA
    Sign {
        /// Подписываемый файл
        input: PathBuf,
        /// Куда сохранить hex-подпись
        #[arg(long, default_value = DEFAULT_SIGNATURE_FILE)]
        out: PathBuf,
        /// Только вывести подпись, не сохраняя её
        #[arg(long)]
        no_save: bool,
    },

    /// Проверить подпись файла публичным ключом DSA
    Verify {
        /// Исходный файл
        input: PathBuf,
        /// Файл с hex-подписью
        signature: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "crypto_manager=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "Ошибка:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut settings = Settings::load(&cli.config)?;
    if let Some(key_dir) = cli.key_dir {
        settings.key_dir = key_dir;
    }

    let manager = CryptoManager::from_settings(&settings);

    match cli.command {
        Commands::RsaKeygen => cli::keygen::rsa(&manager),
        Commands::Encrypt { input, output } => cli::encrypt::encrypt(&manager, &input, &output),
        Commands::Decrypt { input, output } => cli::encrypt::decrypt(&manager, &input, &output),
        Commands::DsaKeygen => cli::keygen::dsa(&manager),
        Commands::Sign { input, out, no_save } => {
            let save_to = (!no_save).then_some(out.as_path());
            cli::sign::sign(&manager, &input, save_to)
        }
        Commands::Verify { input, signature } => cli::sign::verify(&manager, &input, &signature),
    }
}
