//! # decoder-core: Inspeção das Features de um CRF de NER
//!
//! Classificadores CRF de NER pré-treinados descrevem cada token com centenas de
//! features cujos nomes internos são opacos (`fox-WORD|C`, `brown-PW|C`,
//! `LOWERCASE-TYPE|C`, ...). Este crate traduz esses nomes para um conjunto
//! pequeno de tags legíveis e com namespace (`w[0]=fox`, `w[-1]=brown`,
//! `sh[0]=LOWERCASE`), tornando o modelo inspecionável.
//!
//! O modelo em si fica de fora: a entrada é o que ele emite por token.
//!
//! ## Arquitetura
//!
//! 1.  **Entrada**: nomes crus de features (por token) ou um dump ([`dump`]).
//! 2.  **Regras** ([`rules`]): tabela ordenada de ~30 regras de sufixo/literal.
//! 3.  **Decodificação** ([`decoder`]): primeira regra que casa vence; o sentinela
//!     `PSEQ|CpC` é ignorado; strings sem regra vão para o log de diagnóstico.
//! 4.  **Saída**: conjunto de tags `categoria=valor`, a visão por campo
//!     ([`fielded`]) ou eventos por token ([`stream`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use decoder_core::{decode_all, extract_fielded};
//!
//! let raw = ["fox-WORD|C", "brown-PW|C", "LOWERCASE-TYPE|C", "PSEQ|CpC"];
//!
//! let tags = decode_all(raw);
//! assert!(tags.contains("w[0]=fox"));
//! assert!(tags.contains("sh[0]=LOWERCASE"));
//!
//! let fielded = extract_fielded(raw);
//! assert!(fielded.get("w[-1]").unwrap().contains("brown"));
//! ```

pub mod decoder;
pub mod dump;
pub mod error;
pub mod fielded;
pub mod rules;
pub mod stream;

pub use decoder::{
    decode_all, decode_one, decode_report, report_unmatched, DecodeOutcome, DecodeReport, Decoder,
    SENTINEL,
};
pub use dump::{load_dump, parse_dump, report_tokens, TokenFeatures, TokenReport};
pub use error::{DecoderError, Result};
pub use fielded::{extract_fielded, FieldedFeatures};
pub use rules::{DecodedTag, Matcher, Rule, RuleInfo, RULES};
pub use stream::{decode_streaming, decode_tokens, DecodeEvent};
