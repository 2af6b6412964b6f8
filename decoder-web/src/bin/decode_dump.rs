//! Decodifica um dump de features e imprime, por token, as features cruas e
//! as tags legíveis.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use decoder_core::{load_dump, parse_dump, report_tokens, report_unmatched, TokenFeatures};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "decode-dump", about = "Decodifica os nomes de features de um CRF de NER")]
struct Args {
    /// Arquivo do dump (array JSON ou JSON Lines); `-` ou ausente lê da entrada padrão
    path: Option<PathBuf>,

    /// Imprime os relatórios como JSON
    #[arg(long)]
    json: bool,
}

/// Lê o dump do arquivo, ou de `stdin` quando o caminho é `-` ou ausente.
///
/// Features sem regra não são erro; só E/S e JSON malformado falham.
fn read_tokens(path: Option<&Path>, mut stdin: impl Read) -> anyhow::Result<Vec<TokenFeatures>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            load_dump(p).with_context(|| format!("falha ao ler o dump {}", p.display()))
        }
        _ => {
            let mut input = String::new();
            stdin
                .read_to_string(&mut input)
                .context("falha ao ler a entrada padrão")?;
            parse_dump(&input).context("dump inválido na entrada padrão")
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let tokens = read_tokens(args.path.as_deref(), std::io::stdin())?;
    let reports = report_tokens(&tokens);

    for report in &reports {
        for raw in &report.unmatched {
            report_unmatched(Some(&report.term), raw);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{report}");
        }
    }
    Ok(())
}
