//! # Visão por Campo
//!
//! Agrupa os valores decodificados por categoria, em vez de achatá-los em
//! strings `categoria=valor`. Útil para indexar cada categoria como um campo
//! separado (ex: `w[0] → {fox}`, `sh[0] → {LOWERCASE}`).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::decoder::{report_unmatched, trim_raw, DecodeOutcome, Decoder};

/// Valores decodificados agrupados por categoria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldedFeatures {
    fields: BTreeMap<String, BTreeSet<String>>,
}

impl FieldedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um valor ao campo `category`.
    pub fn insert(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.fields
            .entry(category.into())
            .or_default()
            .insert(value.into());
    }

    /// Valores de uma categoria, se houver algum.
    pub fn get(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.fields.get(category)
    }

    /// Categorias presentes, em ordem.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Número de categorias.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Achata de volta para `categoria=valor`.
    pub fn to_tags(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .flat_map(|(category, values)| values.iter().map(move |v| format!("{category}={v}")))
            .collect()
    }
}

impl Decoder {
    /// Decodifica um lote agrupando os valores por categoria.
    pub fn extract_fielded<I, S>(&self, raw_features: I) -> FieldedFeatures
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fielded = FieldedFeatures::new();
        for raw in raw_features {
            let raw = raw.as_ref();
            match self.decode_one(raw) {
                DecodeOutcome::Decoded(tag) => fielded.insert(tag.category, tag.value),
                DecodeOutcome::Unmatched => report_unmatched(None, trim_raw(raw)),
                DecodeOutcome::Skipped => {}
            }
        }
        fielded
    }
}

/// Decodifica um lote com a tabela padrão, agrupando por categoria.
pub fn extract_fielded<I, S>(raw_features: I) -> FieldedFeatures
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Decoder::new().extract_fielded(raw_features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_all;

    const FOX: [&str; 7] = [
        "fox-WORD|C",
        "fox-PSEQW|CpC",
        "brown-PW|C",
        "quick-brown-PSEQW2|CpC",
        "LOWERCASE-TYPE|C",
        "PSEQ|CpC",
        "noise",
    ];

    #[test]
    fn test_groups_by_category() {
        let fielded = extract_fielded(FOX);
        assert_eq!(fielded.len(), 4);
        assert_eq!(
            fielded.get("w[0]").map(|v| v.len()),
            Some(1),
            "as duas formas de w[0] colapsam"
        );
        assert!(fielded.get("w[-1]").unwrap().contains("brown"));
        assert!(fielded.get("w[-1,0]").unwrap().contains("quick-brown"));
        assert!(fielded.get("ocp").is_none());
    }

    #[test]
    fn test_multiple_values_per_category() {
        let fielded = extract_fielded(["LOWERCASE-TYPE|C", "x-TPS2|CpC"]);
        let shapes: Vec<&str> = fielded
            .get("sh[0]")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(shapes, vec!["LOWERCASE", "x"]);
    }

    #[test]
    fn test_flattens_back_to_decoded_set() {
        let fielded = extract_fielded(FOX);
        assert_eq!(fielded.to_tags(), decode_all(FOX));
        let categories: Vec<&str> = fielded.categories().collect();
        assert_eq!(categories, vec!["sh[0]", "w[-1,0]", "w[-1]", "w[0]"]);
    }

    #[test]
    fn test_empty_input() {
        let fielded = extract_fielded(Vec::<String>::new());
        assert!(fielded.is_empty());
        assert!(fielded.to_tags().is_empty());
    }
}
