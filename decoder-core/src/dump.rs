//! # Dumps de Features por Token
//!
//! O classificador CRF roda fora deste crate. O que chega aqui é um "dump":
//! para cada token da sentença, o texto do token e a lista de nomes crus das
//! features que o modelo ativou.
//!
//! ## Formatos aceitos
//!
//! - **Array JSON**: `[{"term": "fox", "features": ["fox-WORD|C", ...]}, ...]`
//! - **JSON Lines**: um objeto por linha (linhas em branco são ignoradas).

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decoder::Decoder;
use crate::error::{DecoderError, Result};

/// Features cruas de um token, como exportadas pelo classificador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeatures {
    /// Texto do token (ex: "fox").
    pub term: String,
    /// Nomes crus das features ativadas para o token.
    #[serde(default)]
    pub features: Vec<String>,
}

impl TokenFeatures {
    pub fn new(term: impl Into<String>, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            term: term.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resultado legível para um token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReport {
    pub term: String,
    /// Features cruas, sem duplicatas.
    pub features: BTreeSet<String>,
    /// Tags decodificadas (`categoria=valor`).
    pub readable: BTreeSet<String>,
    /// Features que nenhuma regra reconheceu.
    pub unmatched: Vec<String>,
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Term: {}", self.term)?;
        writeln!(f, "Features: [{}]", join(&self.features))?;
        write!(f, "Compressed, Readable-Features: [{}]", join(&self.readable))
    }
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Lê um dump de um texto (array JSON ou JSON Lines).
pub fn parse_dump(input: &str) -> Result<Vec<TokenFeatures>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(vec![]);
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut tokens = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let token = serde_json::from_str(line).map_err(|e| DecoderError::InvalidDump {
            line: i + 1,
            message: e.to_string(),
        })?;
        tokens.push(token);
    }
    Ok(tokens)
}

/// Lê um dump de um arquivo.
pub fn load_dump(path: impl AsRef<Path>) -> Result<Vec<TokenFeatures>> {
    let content = std::fs::read_to_string(path)?;
    parse_dump(&content)
}

impl Decoder {
    /// Decodifica as features de um token.
    pub fn report_token(&self, token: &TokenFeatures) -> TokenReport {
        let features: BTreeSet<String> = token.features.iter().cloned().collect();
        let report = self.decode_report(&features);
        TokenReport {
            term: token.term.clone(),
            features,
            readable: report.tags,
            unmatched: report.unmatched,
        }
    }

    /// Decodifica todos os tokens, preservando a ordem da sentença.
    pub fn report_tokens(&self, tokens: &[TokenFeatures]) -> Vec<TokenReport> {
        tokens.par_iter().map(|t| self.report_token(t)).collect()
    }
}

/// [`Decoder::report_token`] com a tabela padrão.
pub fn report_token(token: &TokenFeatures) -> TokenReport {
    Decoder::new().report_token(token)
}

/// [`Decoder::report_tokens`] com a tabela padrão.
pub fn report_tokens(tokens: &[TokenFeatures]) -> Vec<TokenReport> {
    Decoder::new().report_tokens(tokens)
}

/// Dump de demonstração para "The quick brown fox jumped over the lazy dog."
pub fn demo_dump() -> Vec<TokenFeatures> {
    const DEMO: &[(&str, &[&str])] = &[
        (
            "The",
            &[
                "the-WORD|C", "quick-NW|C", "CAPITALIZED-TYPE|C", "LOWERCASE-NTYPE|C",
                "DT-TAG|C", "JJ-NTAG|C", "the-DT-W-T|C", "#Th#|C", "#The#|C",
                "A17-DISTSIM|C", "B3-NDISTSIM|C", "the-JJ-W-NT|C", "PSEQ|CpC",
            ],
        ),
        (
            "quick",
            &[
                "quick-WORD|C", "the-PW|C", "brown-NW|C", "LOWERCASE-TYPE|C",
                "CAPITALIZED-PTYPE|C", "LOWERCASE-NTYPE|C", "JJ-TAG|C", "DT-PTAG|C",
                "quick-DT-W-PT|C", "B3-DISTSIM|C", "A17-PDISTSIM|C", "#qu#|C",
                "the-quick-PSEQW2|CpC", "quick-PSEQW|CpC", "the-PSEQpW|CpC", "PSEQ|CpC",
            ],
        ),
        (
            "brown",
            &[
                "brown-WORD|C", "quick-PW|C", "fox-NW|C", "the-DISJP|C",
                "LOWERCASE-TYPE|C", "LOWERCASE-LOWERCASE-PCTYPE|C", "JJ-TAG|C",
                "B9-DISTSIM|C", "B3-PDISTSIM|C", "B3-B9-PSEQpcDS|CpC", "#br#|C",
                "#own#|C", "LOWERCASE-PSEQcS|CpC", "PSEQ|CpC",
            ],
        ),
        (
            "fox",
            &[
                "fox-WORD|C", "brown-PW|C", "jumped-NW|C", "over-DISJN|C",
                "LOWERCASE-TYPE|C", "LOWERCASE-CNTYPE|C",
                "LOWERCASE-LOWERCASE-LOWERCASE-PCNTYPE|C", "NN-TAG|C", "VBD-NTAG|C",
                "fox-NN-W-T|C", "fox-VBD-W-NT|C", "A4-DISTSIM|C", "B21-NDISTSIM|C",
                "brown-LOWERCASE-PW_CTYPE|C", "jumped-LOWERCASE-NW_CTYPE|C",
                "quick-LOWERCASE-PPW_CTYPE|C", "over-LOWERCASE-NNW_CTYPE|C", "#fox#|C",
                "NO-OCCURRENCE-PATTERN|C", "PSEQ|CpC",
            ],
        ),
        (
            "jumped",
            &[
                "jumped-WORD|C", "fox-PW|C", "over-NW|C", "LOWERCASE-TYPE|C",
                "VBD-TAG|C", "NN-PTAG|C", "IN-NTAG|C", "B21-DISTSIM|C", "A4-PSEQpDS|CpC",
                "#ju#|C", "#ped#|C", "LOWERCASE-TPS2|CpC", "LOWERCASE-TNS1|CpC", "PSEQ|CpC",
            ],
        ),
        (
            "over",
            &[
                "over-WORD|C", "jumped-PW|C", "the-NW|C", "LOWERCASE-TYPE|C",
                "IN-TAG|C", "B6-DISTSIM|C", "B21-PSEQpDS|CpC", "B6-PSEQcDS|CpC",
                "#ov#|C", "LOWERCASE-PSEQpS|CpC", "PSEQ|CpC",
            ],
        ),
        (
            "the",
            &[
                "the-WORD|C", "over-PW|C", "lazy-NW|C", "LOWERCASE-TYPE|C", "DT-TAG|C",
                "A17-DISTSIM|C", "#th#|C", "LOWERCASE-TYPES|CpC", "PSEQ|CpC",
            ],
        ),
        (
            "lazy",
            &[
                "lazy-WORD|C", "the-PW|C", "dog-NW|C", "LOWERCASE-TYPE|C", "JJ-TAG|C",
                "B3-DISTSIM|C", "#la#|C", "#azy#|C", "PSEQ|CpC",
            ],
        ),
        (
            "dog",
            &[
                "dog-WORD|C", "lazy-PW|C", ".-NW|C", "LOWERCASE-TYPE|C",
                "NN-TAG|C", "A4-DISTSIM|C", "#do#|C", "#dog#|C", "PSEQ|CpC",
            ],
        ),
        (
            ".",
            &[
                ".-WORD|C", "dog-PW|C", "SYMBOL-TYPE|C", ".-TAG|C", "###|C",
                "dog-DISJP|C", "PSEQ|CpC",
            ],
        ),
    ];

    DEMO.iter()
        .map(|(term, features)| TokenFeatures::new(*term, features.iter().copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let tokens = parse_dump(
            r#"[{"term": "fox", "features": ["fox-WORD|C"]}, {"term": "dog"}]"#,
        )
        .unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].features, vec!["fox-WORD|C"]);
        assert!(tokens[1].features.is_empty());
    }

    #[test]
    fn test_parse_json_lines() {
        let input = "{\"term\": \"The\", \"features\": [\"the-WORD|C\"]}\n\n{\"term\": \"fox\", \"features\": [\"fox-WORD|C\", \"PSEQ|CpC\"]}\n";
        let tokens = parse_dump(input).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].term, "fox");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_dump("").unwrap().is_empty());
        assert!(parse_dump("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let input = "{\"term\": \"a\"}\n\nnot json\n";
        match parse_dump(input) {
            Err(DecoderError::InvalidDump { line, .. }) => assert_eq!(line, 3),
            other => panic!("esperava InvalidDump, veio {other:?}"),
        }
        assert!(matches!(parse_dump("[1, 2"), Err(DecoderError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dump("/caminho/que/nao/existe.jsonl").unwrap_err();
        assert!(matches!(err, DecoderError::Io(_)));
    }

    #[test]
    fn test_report_token() {
        let token = TokenFeatures::new(
            "fox",
            ["fox-WORD|C", "fox-WORD|C", "PSEQ|CpC", "weird-thing"],
        );
        let report = report_token(&token);
        assert_eq!(report.term, "fox");
        assert_eq!(report.features.len(), 3);
        assert_eq!(report.readable.len(), 1);
        assert!(report.readable.contains("w[0]=fox"));
        assert_eq!(report.unmatched, vec!["weird-thing"]);
    }

    #[test]
    fn test_report_display() {
        let report = report_token(&TokenFeatures::new("fox", ["fox-WORD|C", "brown-PW|C"]));
        assert_eq!(
            report.to_string(),
            "Term: fox\n\
             Features: [brown-PW|C, fox-WORD|C]\n\
             Compressed, Readable-Features: [w[-1]=brown, w[0]=fox]"
        );
    }

    #[test]
    fn test_report_tokens_keeps_order() {
        let dump = demo_dump();
        let reports = report_tokens(&dump);
        let terms: Vec<&str> = reports.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(
            terms,
            vec!["The", "quick", "brown", "fox", "jumped", "over", "the", "lazy", "dog", "."]
        );
    }

    #[test]
    fn test_demo_dump_fully_decodes() {
        for report in report_tokens(&demo_dump()) {
            assert!(
                report.unmatched.is_empty(),
                "{}: {:?}",
                report.term,
                report.unmatched
            );
            assert!(!report.readable.is_empty());
        }
        let fox = report_token(&demo_dump()[3]);
        assert!(fox.readable.contains("sh[0]=LOWERCASE"));
        assert!(fox.readable.contains("ocp=NO-OCCURRENCE-PATTERN"));
        assert!(fox.readable.contains("sh[0]w[2]=over-LOWERCASE"));
    }
}
