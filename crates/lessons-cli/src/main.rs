use clap::{Parser, Subcommand};
use lessons_chat::{
    ChatConfig, ChatWidget, FileStateStore, Heading, HttpTransport, PageContext, PageId,
    StateStore, SubmitOutcome, render_chat_markdown,
};
use lessons_renderer::SiteBuilder;
use lessons_renderer::site::{DEFAULT_OUTPUT, DEFAULT_TEMPLATE, LANDING};
use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about = "Bashing through Bash - lesson site builder and course assistant", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the lesson sources and the page template
    #[arg(long, global = true, env = "LESSONS_ROOT", default_value = ".")]
    root: PathBuf,

    /// Path to the ui state file
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build index.html from the template and the lesson sources (default)
    Build {
        /// Page template, relative to the root unless absolute
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output file, relative to the root unless absolute
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render an assistant reply read from stdin as chat HTML
    RenderChat,
    /// Ask the course assistant a question about a page
    Ask {
        question: String,

        /// Page to ask about, as a location fragment (e.g. lesson-03)
        #[arg(long)]
        page: Option<String>,

        /// Base URL of the chat proxy
        #[arg(long, env = "LESSONS_CHAT_PROXY")]
        proxy: Option<String>,

        /// OpenRouter key, used when no proxy is set
        #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,
    },
    /// Mark a lesson complete
    Complete {
        /// Lesson page, as a location fragment (e.g. lesson-03)
        page: String,
    },
    /// Remember an OpenRouter API key for direct requests
    SetKey {
        /// The key. An empty string forgets the stored key.
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();
    let store = FileStateStore::new(cli.state.unwrap_or_else(default_state_path));

    match cli.command {
        None => build(&cli.root, None, None)?,
        Some(Commands::Build { template, out }) => build(&cli.root, template, out)?,
        Some(Commands::RenderChat) => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input).into_diagnostic()?;
            println!("{}", render_chat_markdown(&input));
        }
        Some(Commands::Ask {
            question,
            page,
            proxy,
            api_key,
            model,
        }) => {
            let mut state = store.load();
            let page = page
                .as_deref()
                .map(PageId::from_hash)
                .unwrap_or_else(|| state.last_page());
            let mut config = ChatConfig {
                proxy_url: proxy,
                api_key: api_key.or_else(|| state.api_key.clone()),
                ..Default::default()
            };
            if let Some(model) = model {
                config.model = model;
            }

            let context = page_context(&cli.root, page)?;
            let widget = ChatWidget::new(HttpTransport::default(), config);
            let outcome = widget.submit(&question, &context).await;

            if outcome == SubmitOutcome::Ignored {
                return Err(miette::miette!("Question is empty"));
            }
            if let Some(reply) = widget.messages().last().and_then(|m| m.html.clone()) {
                println!("{reply}");
            }

            state.set_last_page(page);
            if let Err(err) = store.save(&state) {
                tracing::warn!(error = %err, "could not save ui state");
            }
            if outcome == SubmitOutcome::Failed {
                return Err(miette::miette!("Chat request failed"));
            }
        }
        Some(Commands::Complete { page }) => {
            let page = PageId::from_hash(&page);
            if page.is_landing() {
                return Err(miette::miette!("Only lessons can be marked complete"));
            }
            let mut state = store.load();
            if state.mark_complete(page) {
                store.save(&state)?;
            }
            println!("✓ {page} complete ({} of 12)", state.completed.len());
        }
        Some(Commands::SetKey { key }) => {
            let mut state = store.load();
            let key = key.trim();
            state.api_key = (!key.is_empty()).then(|| key.to_string());
            store.save(&state)?;
            if state.api_key.is_some() {
                println!("✓ API key saved to {}", store.path().display());
            } else {
                println!("✓ API key removed");
            }
        }
    }

    Ok(())
}

fn build(root: &Path, template: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    if !root.is_dir() {
        return Err(miette::miette!(
            "Lesson directory not found: {}",
            root.display()
        ));
    }

    let builder = SiteBuilder::new(root)
        .with_template(root.join(template.unwrap_or_else(|| DEFAULT_TEMPLATE.into())))
        .with_output(root.join(out.unwrap_or_else(|| DEFAULT_OUTPUT.into())));

    let start = std::time::Instant::now();
    let output = builder.run()?;
    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "build finished");

    let name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());
    println!("Built {name}");
    Ok(())
}

/// Context for `page`: its level 2 and 3 headings and its rendered text.
fn page_context(root: &Path, page: PageId) -> Result<PageContext> {
    let sequence = match page {
        PageId::Landing => LANDING,
        PageId::Lesson(n) => n,
    };
    let document = SiteBuilder::new(root)
        .load_documents()?
        .into_iter()
        .find(|doc| doc.sequence == sequence)
        .ok_or_else(|| miette::miette!("No source for page {page}"))?;

    let headings = document
        .render()
        .anchors
        .into_iter()
        .filter(|anchor| matches!(anchor.level, 2 | 3))
        .map(|anchor| Heading {
            text: anchor.plain_text(),
            id: anchor.id,
        })
        .collect();

    Ok(PageContext::new(
        page,
        headings,
        lessons_renderer::plain_text(&document.markdown),
    ))
}

fn default_state_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bash-lessons")
        .join("state.json")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
