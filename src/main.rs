use std::io::{IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

use texwriter::cli::{Action, CliArgs};
use texwriter::config::EditorConfig;
use texwriter::model::LatexDocument;
use texwriter::render::{self, OutputFormat};
use texwriter::replay::replay;
use texwriter::syntax::SyntaxStyles;
use texwriter::theme::{list_available_themes, load_theme, Theme, ThemeSource};
use texwriter::util::filename_for_display;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let run = args.into_config().map_err(anyhow::Error::msg)?;

    texwriter::tracing::init(run.verbosity);

    let config = match &run.config_path {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    };

    match run.action {
        Action::Highlight {
            file,
            format,
            theme,
        } => {
            let theme_id = theme.unwrap_or_else(|| config.theme.clone());
            let theme = load_theme(&theme_id).unwrap_or_else(|e| {
                tracing::warn!("Failed to load theme '{}': {}, using default", theme_id, e);
                Theme::default()
            });

            let doc = LatexDocument::from_file(&file, &theme.syntax)
                .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(&file))))?;
            if !doc.language.has_highlighting() {
                tracing::warn!(
                    "{} is not a LaTeX file, highlighting as LaTeX anyway",
                    doc.display_name()
                );
            }

            let output = match format {
                OutputFormat::Ansi => {
                    if config.color.enabled(std::io::stdout().is_terminal()) {
                        render::ansi::render_document(&doc, &theme.syntax)
                    } else {
                        doc.text()
                    }
                }
                OutputFormat::Json => {
                    let mut json =
                        render::json::render(&doc).context("Failed to serialize spans")?;
                    json.push('\n');
                    json
                }
                OutputFormat::Plain => render::json::render_plain(&doc),
            };

            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write output")?;
        }
        Action::Replay { file, chunk } => {
            let text = texwriter::util::read_text_file(&file)
                .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(&file))))?;

            let report = replay(&text, chunk, &SyntaxStyles::default());
            println!("file:            {}", file.display());
            println!("chars:           {}", report.chars);
            println!("edits:           {}", report.edits);
            println!("tokens scanned:  {}", report.tokens_scanned);
            println!("chars scanned:   {}", report.chars_scanned);
            println!("max per edit:    {}", report.max_chars_scanned);
            println!("math chars:      {}", report.math_chars_scanned);

            if let Some(mismatch) = &report.mismatch {
                for span in &mismatch.incremental_only {
                    println!("  incremental only: {} {}..{}", span.kind, span.start, span.end);
                }
                for span in &mismatch.full_only {
                    println!("  full scan only:   {} {}..{}", span.kind, span.start, span.end);
                }
                bail!("incremental tags differ from a full scan");
            }
            println!("result:          consistent");
        }
        Action::Themes { set: Some(id) } => {
            let path = run
                .config_path
                .clone()
                .or_else(texwriter::config_paths::config_file)
                .context("No config directory available")?;
            let mut config = config;
            config
                .select_theme(&id)
                .map_err(|e| anyhow::anyhow!("Cannot select theme '{}': {}", id, e))?;
            config.save_to(&path).map_err(anyhow::Error::msg)?;
            println!("theme set to {} in {}", id, path.display());
        }
        Action::Themes { set: None } => {
            for info in list_available_themes() {
                let marker = if info.id == config.theme { '*' } else { ' ' };
                let source = match info.source {
                    ThemeSource::User => "user",
                    ThemeSource::Builtin => "builtin",
                };
                println!("{} {:<20} {:<8} {}", marker, info.id, source, info.name);
            }
        }
    }

    Ok(())
}
