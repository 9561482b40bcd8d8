use anyhow::{Context, Result, bail};
use clap::Parser;
use schemagen::{Format, generate, load_schema};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Schema snapshot exported by the editor (JSON)
    schema: PathBuf,
    /// Target format: prisma, sql, sequelize, typeorm, sqlalchemy, mongoose, dbml, typescript
    #[arg(short, long, default_value = "prisma")]
    format: String,
    /// Path to write the generated code. Prints to stdout if not set.
    #[arg(short, long, conflicts_with_all = ["download", "all"])]
    output: Option<PathBuf>,
    /// Write to DIR using the format's default file name
    #[arg(long, value_name = "DIR", conflicts_with = "all")]
    download: Option<PathBuf>,
    /// Write every format into DIR
    #[arg(long, value_name = "DIR")]
    all: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let schema = load_schema(&cli.schema)
        .with_context(|| format!("failed to load schema {}", cli.schema.display()))?;

    if let Some(dir) = &cli.all {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for format in Format::ALL {
            write(&dir.join(format.file_name()), format, &generate(&schema, format))?;
        }
        return Ok(());
    }

    let Some(format) = Format::from_str(&cli.format) else {
        let known: Vec<&str> = Format::ALL.iter().map(|f| f.display_name()).collect();
        bail!("unknown format '{}' (expected one of: {})", cli.format, known.join(", "));
    };
    let code = generate(&schema, format);

    match (&cli.output, &cli.download) {
        (Some(path), _) => write(path, format, &code)?,
        (None, Some(dir)) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            write(&dir.join(format.file_name()), format, &code)?;
        }
        (None, None) => print!("{}", code),
    }
    Ok(())
}

fn write(path: &Path, format: Format, code: &str) -> Result<()> {
    fs::write(path, code).with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        format = format.display_name(),
        bytes = code.len(),
        "wrote generated code"
    );
    Ok(())
}
