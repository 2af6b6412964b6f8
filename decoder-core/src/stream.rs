//! # Decodificação com Eventos Observáveis
//!
//! Processa um dump token a token e emite eventos via um canal Rust (`mpsc`),
//! permitindo que o servidor WebSocket mostre o progresso em tempo real.

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::decoder::Decoder;
use crate::dump::{TokenFeatures, TokenReport};

/// Eventos emitidos durante a decodificação de um dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DecodeEvent {
    /// **Passo 1**: dump recebido.
    DumpLoaded { total: usize },
    /// Uma feature do token não casou com nenhuma regra.
    Unmatched {
        token_index: usize,
        term: String,
        raw: String,
    },
    /// **Passo 2**: tags legíveis de um token.
    TokenDecoded {
        token_index: usize,
        term: String,
        readable: Vec<String>,
    },
    /// **Conclusão**: todos os relatórios, na ordem da sentença.
    Done {
        reports: Vec<TokenReport>,
        total_tokens: usize,
        unmatched_total: usize,
        processing_ms: u64,
    },
    /// **Falha**: entrada ilegível (ex: dump malformado no WebSocket).
    Error { message: String },
}

impl Decoder {
    /// Decodifica o dump enviando `DecodeEvent`s pelo canal `tx`.
    ///
    /// Ordem: `DumpLoaded`, depois por token os `Unmatched` seguidos de
    /// `TokenDecoded`, e por fim `Done`. Se o receptor já tiver sido
    /// descartado os envios são ignorados.
    pub fn decode_streaming(&self, tokens: &[TokenFeatures], tx: mpsc::Sender<DecodeEvent>) {
        let start = Instant::now();
        let _ = tx.send(DecodeEvent::DumpLoaded {
            total: tokens.len(),
        });

        let mut reports = Vec::with_capacity(tokens.len());
        let mut unmatched_total = 0;

        for (i, token) in tokens.iter().enumerate() {
            let report = self.report_token(token);
            for raw in &report.unmatched {
                let _ = tx.send(DecodeEvent::Unmatched {
                    token_index: i,
                    term: report.term.clone(),
                    raw: raw.clone(),
                });
            }
            unmatched_total += report.unmatched.len();

            let _ = tx.send(DecodeEvent::TokenDecoded {
                token_index: i,
                term: report.term.clone(),
                readable: report.readable.iter().cloned().collect(),
            });
            reports.push(report);
        }

        let _ = tx.send(DecodeEvent::Done {
            total_tokens: reports.len(),
            reports,
            unmatched_total,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    /// Versão síncrona: consome os eventos e devolve os relatórios finais.
    pub fn decode_tokens(&self, tokens: &[TokenFeatures]) -> Vec<TokenReport> {
        let (tx, rx) = mpsc::channel();
        self.decode_streaming(tokens, tx);

        let mut result = vec![];
        while let Ok(event) = rx.recv() {
            if let DecodeEvent::Done { reports, .. } = event {
                result = reports;
            }
        }
        result
    }
}

/// [`Decoder::decode_streaming`] com a tabela padrão.
pub fn decode_streaming(tokens: &[TokenFeatures], tx: mpsc::Sender<DecodeEvent>) {
    Decoder::new().decode_streaming(tokens, tx)
}

/// [`Decoder::decode_tokens`] com a tabela padrão.
pub fn decode_tokens(tokens: &[TokenFeatures]) -> Vec<TokenReport> {
    Decoder::new().decode_tokens(tokens)
}
