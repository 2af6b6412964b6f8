//! # Decodificador de Features
//!
//! Recebe o conjunto de nomes crus de features de um token e devolve o conjunto
//! de tags legíveis (`categoria=valor`).
//!
//! ## Fluxo
//!
//! 1. Cada string crua é aparada: saem as pontas com caracteres de controle
//!    e espaço (`<= U+0020`). Espaços Unicode como NBSP são mantidos.
//! 2. O sentinela `PSEQ|CpC` é ignorado em silêncio (não carrega informação).
//! 3. As regras de [`RULES`] são testadas em ordem; a primeira que casar vence.
//! 4. Strings sem regra vão para o canal de diagnóstico (log `WARN`, target
//!    `decoder::unmatched`) e o processamento continua.
//!
//! ```rust
//! use decoder_core::decode_all;
//!
//! let tags = decode_all(["fox-WORD|C", "PSEQ|CpC", "IS_TITLE|C"]);
//! assert!(tags.contains("w[0]=fox"));
//! assert!(tags.contains("ti=TITLE"));
//! assert_eq!(tags.len(), 2);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rules::{DecodedTag, Rule, RULES};

/// Feature sem informação emitida pelo classificador; sempre ignorada.
pub const SENTINEL: &str = "PSEQ|CpC";

/// Target de log usado para as strings que nenhuma regra reconhece.
pub const UNMATCHED_TARGET: &str = "decoder::unmatched";

/// Resultado da decodificação de uma única string crua.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Era o sentinela: nada a fazer.
    Skipped,
    /// Uma regra casou.
    Decoded(DecodedTag),
    /// Nenhuma regra casou.
    Unmatched,
}

/// Resultado de um lote, com o canal de diagnóstico como dado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Tags `categoria=valor`, sem duplicatas.
    pub tags: BTreeSet<String>,
    /// Strings (já aparadas) que nenhuma regra reconheceu, na ordem de entrada.
    pub unmatched: Vec<String>,
    /// Quantas vezes o sentinela apareceu.
    pub skipped: usize,
}

/// Decodificador sobre uma tabela de regras ordenada.
///
/// Não guarda estado além da referência à tabela: pode ser copiado e usado
/// de várias threads ao mesmo tempo.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    rules: &'static [Rule],
}

impl Decoder {
    /// Decodificador com a tabela padrão ([`RULES`]).
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    /// Decodificador com outra tabela (ex: derivada para outra versão do modelo).
    pub const fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Decodifica uma única string crua.
    pub fn decode_one(&self, raw: &str) -> DecodeOutcome {
        let raw = trim_raw(raw);
        if raw == SENTINEL {
            return DecodeOutcome::Skipped;
        }
        match self.rules.iter().find_map(|rule| rule.parse(raw)) {
            Some(tag) => DecodeOutcome::Decoded(tag),
            None => DecodeOutcome::Unmatched,
        }
    }

    /// Decodifica um lote e devolve o conjunto de tags.
    ///
    /// Strings não reconhecidas são registradas via `tracing` e descartadas.
    pub fn decode_all<I, S>(&self, raw_features: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = BTreeSet::new();
        for raw in raw_features {
            let raw = raw.as_ref();
            match self.decode_one(raw) {
                DecodeOutcome::Decoded(tag) => {
                    tags.insert(tag.to_string());
                }
                DecodeOutcome::Unmatched => report_unmatched(None, trim_raw(raw)),
                DecodeOutcome::Skipped => {}
            }
        }
        tags
    }

    /// Como [`Decoder::decode_all`], mas devolve as strings não reconhecidas
    /// no relatório em vez de registrá-las.
    pub fn decode_report<I, S>(&self, raw_features: I) -> DecodeReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = DecodeReport::default();
        for raw in raw_features {
            let raw = raw.as_ref();
            match self.decode_one(raw) {
                DecodeOutcome::Decoded(tag) => {
                    report.tags.insert(tag.to_string());
                }
                DecodeOutcome::Unmatched => report.unmatched.push(trim_raw(raw).to_string()),
                DecodeOutcome::Skipped => report.skipped += 1,
            }
        }
        report
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove das pontas os caracteres `<= U+0020` (controle e espaço ASCII).
pub(crate) fn trim_raw(raw: &str) -> &str {
    raw.trim_matches(|c: char| c <= ' ')
}

/// Envia uma string não reconhecida para o canal de diagnóstico,
/// opcionalmente com o token de onde ela veio.
pub fn report_unmatched(term: Option<&str>, raw: &str) {
    match term {
        Some(term) => warn!(target: UNMATCHED_TARGET, term, raw, "feature sem regra correspondente"),
        None => warn!(target: UNMATCHED_TARGET, raw, "feature sem regra correspondente"),
    }
}

/// Decodifica uma string com a tabela padrão.
pub fn decode_one(raw: &str) -> DecodeOutcome {
    Decoder::new().decode_one(raw)
}

/// Decodifica um lote com a tabela padrão.
pub fn decode_all<I, S>(raw_features: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Decoder::new().decode_all(raw_features)
}

/// Decodifica um lote com a tabela padrão, devolvendo o relatório completo.
pub fn decode_report<I, S>(raw_features: I) -> DecodeReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Decoder::new().decode_report(raw_features)
}
