use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::Value;

use stwtags::{options, StwConfig, TagLibrary};

#[derive(Parser)]
#[command(name = "stwtags", version, about = "Render ShrinkTheWeb image tags")]
struct Cli {
    /// JSON file with the site-wide STW settings, e.g. {"stwaccesskeyid": "..."}
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a tag invocation to an <img> element
    Render {
        /// Tag invocation, e.g. "{% stwimage 'example.com' 'Example' stwsize=lg %}"
        tag: String,
        /// JSON file holding the template context
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Print the validated query parameters a tag would send
    Params {
        tag: String,
    },
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<StwConfig> {
    match path {
        Some(p) => Ok(serde_json::from_value(read_json(p)?)
            .with_context(|| format!("invalid STW settings in {}", p.display()))?),
        None => Ok(StwConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let library = TagLibrary::new(load_settings(cli.settings.as_deref())?);

    match cli.command {
        Command::Render { tag, context } => {
            let ctx = match context {
                Some(p) => read_json(&p)?,
                None => Value::Object(Default::default()),
            };
            let html = library
                .render(&tag, &ctx)
                .with_context(|| format!("failed to render {}", tag))?;
            println!("{}", html);
        }
        Command::Params { tag } => {
            let params = library.parse(&tag)?.url_params()?;
            println!("{}", options::encode_query(&params));
        }
    }
    Ok(())
}
