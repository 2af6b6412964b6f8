//! # Tabela de Regras: Nomes Internos de Features do CRF
//!
//! O classificador CRF de NER nomeia suas features com uma codificação própria:
//! o conteúdo (palavra, forma, cluster, POS) vem primeiro e um marcador no final
//! indica a categoria e o deslocamento relativo ao token (ex: `fox-WORD|C`,
//! `brown-PW|C`, `LOWERCASE-TYPE|C`).
//!
//! Esta tabela traduz esses marcadores para rótulos curtos e legíveis:
//!
//! | Rótulo | Significado                         |
//! |--------|-------------------------------------|
//! | `w`    | palavra                             |
//! | `sh`   | forma (shape) da palavra            |
//! | `p`    | etiqueta morfossintática (POS)      |
//! | `c`    | cluster distribucional (distsim)    |
//! | `cl`   | cluster de pontuação                |
//! | `ng`   | n-grama de caracteres               |
//! | `ocp`  | padrão de ocorrência                |
//! | `ti`   | título                              |
//!
//! Os índices entre colchetes (`[-1]`, `[0]`, `[1]`, ...) são relativos ao token atual.
//!
//! ## Ordem
//!
//! A codificação é ambígua: várias categorias compartilham os mesmos caracteres
//! finais. A **primeira** regra que casa vence, então a ordem de [`RULES`] é fixa
//! e faz parte do contrato.

use std::fmt;

use serde::Serialize;

/// Marcador das features de padrão de ocorrência.
const OCCURRENCE_MARKER: &str = "OCCURRENCE";
/// Valor fixo quando nenhum padrão de ocorrência foi observado.
const NO_OCCURRENCE: &str = "NO-OCCURRENCE-PATTERN";
/// Terminações aceitas para um padrão de ocorrência.
const OCCURRENCE_ENDINGS: [&str; 4] = ["-X|C", "-XY|C", "-YX|C", "-Y|C"];
/// Sufixo de classe removido do padrão de ocorrência.
const CLASS_SUFFIX: &str = "|C";

/// Estratégia de casamento de uma regra.
///
/// Todas as estratégias operam sobre a string crua (sem regex) e nunca falham:
/// `None` significa apenas "esta regra não se aplica".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// A string inteira deve ser igual a `literal`; o valor é a constante `value`.
    Exact {
        literal: &'static str,
        value: &'static str,
    },
    /// A string deve terminar com um dos sufixos (testados em ordem);
    /// o valor é o que vem antes do primeiro sufixo que casar.
    Suffix(&'static [&'static str]),
    /// N-grama de caracteres: termina com `suffix` e o conteúdo começa com `#`.
    /// Sem o `#` inicial a regra não casa (em vez de descartar o primeiro caractere).
    HashNgram { suffix: &'static str },
    /// Padrão de ocorrência: contém `OCCURRENCE` e termina com `-X|C`, `-XY|C`,
    /// `-YX|C` ou `-Y|C` (ou começa com `NO-OCCURRENCE-PATTERN`).
    Occurrence,
}

impl Matcher {
    /// Extrai o valor da string crua, se esta estratégia se aplicar.
    pub fn extract<'a>(&self, raw: &'a str) -> Option<&'a str> {
        match *self {
            Matcher::Exact { literal, value } => (raw == literal).then_some(value),
            Matcher::Suffix(suffixes) => suffixes.iter().find_map(|s| raw.strip_suffix(s)),
            Matcher::HashNgram { suffix } => raw.strip_suffix(suffix)?.strip_prefix('#'),
            Matcher::Occurrence => extract_occurrence(raw),
        }
    }

    /// Nome curto da estratégia (para listagem na UI)
    pub fn kind(&self) -> &'static str {
        match self {
            Matcher::Exact { .. } => "exact",
            Matcher::Suffix(_) => "suffix",
            Matcher::HashNgram { .. } => "hash_ngram",
            Matcher::Occurrence => "occurrence",
        }
    }

    /// Literais que a estratégia procura, na ordem em que são testados.
    pub fn patterns(&self) -> Vec<String> {
        match self {
            Matcher::Exact { literal, .. } => vec![literal.to_string()],
            Matcher::Suffix(suffixes) => suffixes.iter().map(|s| s.to_string()).collect(),
            Matcher::HashNgram { suffix } => vec![suffix.to_string()],
            Matcher::Occurrence => std::iter::once(NO_OCCURRENCE)
                .chain(OCCURRENCE_ENDINGS)
                .map(str::to_string)
                .collect(),
        }
    }
}

fn extract_occurrence(raw: &str) -> Option<&str> {
    if !raw.contains(OCCURRENCE_MARKER) {
        return None;
    }
    if raw.starts_with(NO_OCCURRENCE) {
        return Some(NO_OCCURRENCE);
    }
    if OCCURRENCE_ENDINGS.iter().any(|e| raw.ends_with(e)) {
        return raw.strip_suffix(CLASS_SUFFIX);
    }
    None
}

/// Uma tag decodificada: o par `(categoria, valor)`.
///
/// Exibida como `categoria=valor` (ex: `w[0]=fox`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DecodedTag {
    pub category: &'static str,
    pub value: String,
}

impl fmt::Display for DecodedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.category, self.value)
    }
}

/// Uma regra da tabela: rótulo de categoria + estratégia de casamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub category: &'static str,
    pub matcher: Matcher,
}

impl Rule {
    const fn exact(category: &'static str, literal: &'static str, value: &'static str) -> Self {
        Self {
            category,
            matcher: Matcher::Exact { literal, value },
        }
    }

    const fn suffix(category: &'static str, suffixes: &'static [&'static str]) -> Self {
        Self {
            category,
            matcher: Matcher::Suffix(suffixes),
        }
    }

    /// Valor extraído pela regra, sem o rótulo.
    pub fn extract<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.matcher.extract(raw)
    }

    /// Aplica a regra e monta a tag `categoria=valor`.
    pub fn parse(&self, raw: &str) -> Option<DecodedTag> {
        self.extract(raw).map(|value| DecodedTag {
            category: self.category,
            value: value.to_string(),
        })
    }

    /// Descrição serializável da regra na posição `position` (1-based).
    pub fn describe(&self, position: usize) -> RuleInfo {
        RuleInfo {
            position,
            category: self.category,
            kind: self.matcher.kind(),
            patterns: self.matcher.patterns(),
        }
    }
}

/// Visão de uma regra para exibição (ex: endpoint `/rules`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub position: usize,
    pub category: &'static str,
    pub kind: &'static str,
    pub patterns: Vec<String>,
}

/// Tabela de regras, em ordem de prioridade.
pub static RULES: [Rule; 30] = [
    Rule::exact("cl", "###|C", "#"),
    Rule {
        category: "ng",
        matcher: Matcher::HashNgram { suffix: "#|C" },
    },
    Rule::suffix("w[R]", &["-DISJN|C"]),
    Rule::suffix("w[L]", &["-DISJP|C"]),
    Rule::suffix("w[-1]", &["-PW|C", "-PSEQpW|CpC"]),
    Rule::suffix("p[1]", &["-NTAG|C"]),
    Rule::suffix("sh[-1,0,1]", &["-PCNTYPE|C"]),
    Rule::suffix("sh[-1,0]", &["-PCTYPE|C", "-TYPES|CpC"]),
    Rule::suffix("w[0]", &["-WORD|C", "-PSEQW|CpC"]),
    Rule::suffix("c[1]", &["-NDISTSIM|C"]),
    Rule::suffix("sh[0]w[-2]", &["-PPW_CTYPE|C"]),
    Rule::suffix("w[0]p[-1]", &["-W-PT|C"]),
    Rule::suffix("sh[0,1]", &["-CNTYPE|C"]),
    Rule::suffix("sh[0]", &["-TYPE|C", "-TPS2|CpC", "-PSEQcS|CpC"]),
    Rule::suffix("w[0]p[1]", &["-W-NT|C"]),
    Rule {
        category: "ocp",
        matcher: Matcher::Occurrence,
    },
    Rule::suffix("w[1]", &["-NW|C"]),
    Rule::suffix("sh[0]w[-1]", &["-PW_CTYPE|C"]),
    Rule::exact("ti", "IS_TITLE|C", "TITLE"),
    Rule::suffix("sh[0]w[2]", &["-NNW_CTYPE|C"]),
    Rule::suffix("c[0]", &["-DISTSIM|C", "-PSEQcDS|CpC"]),
    Rule::suffix("c[-1]", &["-PDISTSIM|C", "-PSEQpDS|CpC"]),
    Rule::suffix("c[-1,0]", &["-PSEQpcDS|CpC"]),
    Rule::suffix("p[0]", &["-TAG|C"]),
    Rule::suffix("sh[0]w[1]", &["-NW_CTYPE|C"]),
    Rule::suffix("sh[-1]", &["-PTYPE|C", "-PSEQpS|CpC"]),
    Rule::suffix("sh[1]", &["-NTYPE|C", "-TNS1|CpC"]),
    Rule::suffix("w[-1,0]", &["-PSEQW2|CpC"]),
    Rule::suffix("w[0]p[0]", &["-W-T|C"]),
    Rule::suffix("p[-1]", &["-PTAG|C"]),
];

/// Descreve a tabela inteira, na ordem de prioridade.
pub fn describe_rules(rules: &[Rule]) -> Vec<RuleInfo> {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| rule.describe(i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(category: &str) -> &'static Rule {
        RULES
            .iter()
            .find(|r| r.category == category)
            .expect("categoria presente na tabela")
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(rule("ti").extract("IS_TITLE|C"), Some("TITLE"));
        assert_eq!(rule("ti").extract("IS_TITLE|CpC"), None);
        assert_eq!(rule("cl").extract("###|C"), Some("#"));
    }

    #[test]
    fn test_suffix_alternatives_in_order() {
        let w_prev = rule("w[-1]");
        assert_eq!(w_prev.extract("brown-PW|C"), Some("brown"));
        assert_eq!(w_prev.extract("the-PSEQpW|CpC"), Some("the"));
        assert_eq!(w_prev.extract("brown-NW|C"), None);

        let shape = rule("sh[0]");
        assert_eq!(shape.extract("LOWERCASE-TYPE|C"), Some("LOWERCASE"));
        assert_eq!(shape.extract("x-TPS2|CpC"), Some("x"));
        assert_eq!(shape.extract("x-PSEQcS|CpC"), Some("x"));
    }

    #[test]
    fn test_hash_ngram_requires_leading_hash() {
        let ng = rule("ng");
        assert_eq!(ng.extract("#fox#|C"), Some("fox"));
        assert_eq!(ng.extract("#f#|C"), Some("f"));
        // Sem o '#' inicial a regra não se aplica
        assert_eq!(ng.extract("fox#|C"), None);
        assert_eq!(ng.extract("#|C"), None);
    }

    #[test]
    fn test_occurrence_pattern() {
        let ocp = rule("ocp");
        assert_eq!(
            ocp.extract("NO-OCCURRENCE-PATTERN|C"),
            Some("NO-OCCURRENCE-PATTERN")
        );
        assert_eq!(
            ocp.extract("OCCURRENCE-PATTERN-XY|C"),
            Some("OCCURRENCE-PATTERN-XY")
        );
        assert_eq!(ocp.extract("OCCURRENCE-Y|C"), Some("OCCURRENCE-Y"));
        // Contém o marcador mas não termina com um padrão conhecido
        assert_eq!(ocp.extract("OCCURRENCE-Z|C"), None);
        // Termina com -X|C mas sem o marcador
        assert_eq!(ocp.extract("fox-X|C"), None);
    }

    #[test]
    fn test_parse_builds_tag() {
        let tag = rule("w[0]").parse("fox-WORD|C").unwrap();
        assert_eq!(tag.category, "w[0]");
        assert_eq!(tag.value, "fox");
        assert_eq!(tag.to_string(), "w[0]=fox");
    }

    #[test]
    fn test_table_order_and_categories_unique() {
        assert_eq!(RULES[0].category, "cl");
        assert_eq!(RULES[29].category, "p[-1]");

        let mut seen = std::collections::HashSet::new();
        for r in RULES.iter() {
            assert!(seen.insert(r.category), "categoria duplicada: {}", r.category);
        }
    }

    #[test]
    fn test_describe_rules() {
        let infos = describe_rules(&RULES);
        assert_eq!(infos.len(), RULES.len());
        assert_eq!(infos[0].position, 1);
        assert_eq!(infos[0].kind, "exact");
        assert_eq!(infos[4].patterns, vec!["-PW|C", "-PSEQpW|CpC"]);
        let ocp = infos.iter().find(|i| i.category == "ocp").unwrap();
        assert_eq!(ocp.kind, "occurrence");
        assert_eq!(ocp.patterns.len(), 5);
    }
}
