use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::info;
use widgetkit::{
    apply_brand_kit, codec, compose,
    form::FormRenderer,
    web::{self, AppState},
};
use widgetool::{
    ctx::{AppContext, ConfigSource},
    menuconfig,
    settings::Settings,
};

/// Configure, export and share embeddable widgets.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file (default: .widgetool.toml)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered widgets
    List,
    /// Show the form generated for a widget
    Fields {
        widget: String,
        /// Print the form model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose a standalone HTML document
    Export {
        widget: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Brand kit to apply
        #[arg(long)]
        brand: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a share link
    Link {
        widget: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Decode a share token into JSON
    Decode { token: String },
    /// Serve the embed entry point and JSON API
    Serve {
        /// Bind address (default: `listen` from settings)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Edit a widget interactively
    Edit {
        widget: String,
        /// Brand kit applied at start
        #[arg(long)]
        brand: Option<String>,
        /// Export target for the `e` key (default: <widget>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of the settings file
    Schema,
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file holding the configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Share token holding the configuration
    #[arg(long)]
    token: Option<String>,
    /// Override one value, e.g. `--set lightMode.textColor=#fff`
    #[arg(long = "set", value_name = "PATH=JSON")]
    sets: Vec<String>,
}

impl From<SourceArgs> for ConfigSource {
    fn from(args: SourceArgs) -> Self {
        ConfigSource {
            file: args.config,
            token: args.token,
            sets: args.sets,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        println!("{}", serde_json::to_string_pretty(&Settings::schema())?);
        return Ok(());
    }
    if let Command::Decode { token } = &cli.command {
        let config = codec::decode(token).context("invalid share token")?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let ctx = AppContext::load(cli.settings).await?;

    match cli.command {
        Command::List => {
            for def in ctx.registry.list() {
                println!(
                    "{:<14} {:<16} {}",
                    def.id.bold().green(),
                    def.label,
                    def.description.as_deref().unwrap_or_default().dimmed()
                );
            }
        }
        Command::Fields { widget, json } => {
            let def = ctx.widget(&widget)?;
            let form = FormRenderer::new(&def).build(&def.default_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                for section in &form.sections {
                    println!("{}", section.title.bold().purple());
                    for control in &section.controls {
                        let locked = if control.locked { " (locked)" } else { "" };
                        println!("  {:<28} {}{}", control.path.cyan(), control.label, locked);
                    }
                }
            }
        }
        Command::Export {
            widget,
            source,
            brand,
            output,
        } => {
            let def = ctx.widget(&widget)?;
            let config = ctx.load_config(&def, &source.into()).await?;
            let brand = brand.as_deref().map(|id| ctx.brand(id)).transpose()?;
            let brand = brand.filter(|k| !k.is_neutral());
            let config = match brand {
                Some(kit) => apply_brand_kit(&config, kit),
                None => config,
            };
            let document = compose(&def, &config, brand);
            match output {
                Some(path) => {
                    tokio::fs::write(&path, document.to_string())
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{}", format!("Exported {}", path.display()).bold().green());
                }
                None => print!("{document}"),
            }
        }
        Command::Link { widget, source } => {
            let def = ctx.widget(&widget)?;
            let config = ctx.load_config(&def, &source.into()).await?;
            let url = widgetkit::router::embed_url(&ctx.base_url()?, &def.id, &config);
            println!("{url}");
        }
        Command::Serve { listen } => {
            let addr = ctx.listen_addr(listen.as_deref())?;
            let state = AppState::new(ctx.registry.clone(), ctx.kits.clone(), ctx.base_url()?);
            info!("serving {} widget(s)", ctx.registry.len());
            web::serve(addr, state).await?;
        }
        Command::Edit {
            widget,
            brand,
            output,
        } => {
            let session = ctx.session(&widget, brand.as_deref())?;
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{widget}.html")));
            let outcome = menuconfig::run(session, ctx.base_url()?, output)?;
            if let Some(path) = &outcome.exported {
                println!("{}", format!("Exported {}", path.display()).bold().green());
            } else {
                println!("{}", "Nothing exported".yellow());
            }
            println!("{}", outcome.session.share_link(&ctx.base_url()?));
        }
        Command::Schema | Command::Decode { .. } => {}
    }

    Ok(())
}
