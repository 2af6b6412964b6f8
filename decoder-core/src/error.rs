//! Erros do crate.
//!
//! A decodificação em si nunca falha; os erros abaixo vêm apenas da leitura
//! dos dumps de features (arquivo, JSON).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("falha de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dump inválido na linha {line}: {message}")]
    InvalidDump { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, DecoderError>;
