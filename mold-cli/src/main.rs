use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mold_cli::{check_cmd, collect_bindings, parse_assignment, placeholders_cmd, render_cmd};
use mold_template::ParseOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mold", version, about = "Mold template CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParseArgs {
    /// Skip whitespace-only text between tags
    #[arg(long)]
    drop_whitespace: bool,
    /// Treat an extra tag name as void (repeatable)
    #[arg(long = "void", value_name = "TAG")]
    void_elements: Vec<String>,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        self.void_elements
            .iter()
            .fold(ParseOptions::new().drop_whitespace_text(self.drop_whitespace), |o, t| {
                o.void_element(t.as_str())
            })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in placeholders and print the resulting HTML.
    Render {
        /// Path to the template file
        input: PathBuf,
        /// Bind a placeholder (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        sets: Vec<(String, String)>,
        /// Clear a placeholder to the empty string (repeatable)
        #[arg(long = "clear", value_name = "NAME")]
        clears: Vec<String>,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// List the placeholder names a template uses.
    Placeholders {
        input: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Parse a template and report errors.
    Check {
        input: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            input,
            sets,
            clears,
            parse,
        } => {
            let bindings = collect_bindings(&sets, &clears);
            println!("{}", render_cmd(&input, &bindings, &parse.options())?);
        }
        Commands::Placeholders { input, parse } => {
            for name in placeholders_cmd(&input, &parse.options())? {
                println!("{name}");
            }
        }
        Commands::Check { input, parse } => {
            let roots = check_cmd(&input, &parse.options())?;
            log::info!("{}: ok, {} root node(s)", input.display(), roots);
        }
    }
    Ok(())
}
