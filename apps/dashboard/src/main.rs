use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    modal::SaveOutcome,
    navigation::{AppSignal, HistoryNavigator, NavigationGate, LOGIN_PATH},
    view::{Logo, ProjectsPage, ProjectsView, EMPTY_LABEL, PAGE_TITLE, RETRY_LABEL},
    Affordances, DeleteOutcome, DraftField, FileSessionStore, HttpProjectsService, Session,
};
use shared::{ProjectId, SessionUser};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_api_url, Settings};

const PROJECTS_ROUTE: &str = "/projects";

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Projects operations dashboard")]
struct Args {
    /// Settings file (defaults to ./dashboard.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured API root
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the projects page.
    List,
    /// Create a project from `--set field=value` pairs.
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edit a project; unset fields keep their stored value.
    Edit {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a project. Without `--yes` the request is only armed.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Store a session as the sign-in page would.
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
    /// Print the navigation menu for the stored session.
    Menu {
        #[arg(long, default_value = PROJECTS_ROUTE)]
        path: String,
        #[arg(long, default_value_t = 1280)]
        width: u32,
    },
}

/// Everything that lives for one application lifetime. A reinitialize signal
/// drops the whole value and builds a new one.
struct App {
    page: ProjectsPage,
    nav: NavigationGate,
    session: Arc<FileSessionStore>,
}

impl App {
    fn build(settings: &Settings, route: &str) -> Result<Self> {
        let session = Arc::new(FileSessionStore::new(&settings.session_file));
        let service = HttpProjectsService::new(&settings.api_url)
            .with_context(|| format!("failed to build projects client for {}", settings.api_url))?
            .with_session(session.clone());
        let page = ProjectsPage::new(Arc::new(service), session.clone());
        let nav = NavigationGate::new(Arc::new(HistoryNavigator::new(route)), session.clone())
            .with_mobile_breakpoint(settings.mobile_breakpoint);
        Ok(Self { page, nav, session })
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = &args.api_url {
        settings.api_url = normalize_api_url(api_url)?;
    }
    init_tracing(&settings.log_filter);

    let route = match &args.command {
        Command::Menu { path, .. } => path.clone(),
        _ => PROJECTS_ROUTE.to_string(),
    };
    let app = App::build(&settings, &route)?;
    let mut signals = app.nav.subscribe();

    run(&app, args.command).await?;

    if let Ok(AppSignal::Reinitialize) = signals.try_recv() {
        drop(app);
        let fresh = App::build(&settings, LOGIN_PATH)?;
        info!(menu = ?fresh.nav.menu(), "application state reinitialized");
    }
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::List => {
            app.page.mount().await;
            print_view(&app.page.render().await);
        }
        Command::Create { fields } => {
            require_staff(&app.page.session())?;
            app.page.modal.open_create().await;
            apply_fields(app, &fields).await?;
            report_save(app.page.modal.save().await)?;
        }
        Command::Edit { id, fields } => {
            require_staff(&app.page.session())?;
            app.page.mount().await;
            let id = ProjectId::new(id);
            let Some(project) = app.page.list.find(&id).await else {
                bail!("project {id} not found");
            };
            app.page.modal.open_edit(&project).await;
            apply_fields(app, &fields).await?;
            report_save(app.page.modal.save().await)?;
        }
        Command::Delete { id, yes } => {
            require_staff(&app.page.session())?;
            app.page.mount().await;
            let id = ProjectId::new(id);
            app.page.deletes.request_delete(id.clone()).await;
            if !yes {
                println!("O'chirishni tasdiqlaysizmi? Re-run with --yes to delete {id}.");
                app.page.deletes.cancel_confirm().await;
                return Ok(());
            }
            match app.page.deletes.confirm(&id).await {
                DeleteOutcome::Deleted(id) => println!("Deleted {id}"),
                DeleteOutcome::Failed(message) => bail!(message),
                other => bail!("delete not performed: {other:?}"),
            }
        }
        Command::Login { token, role, name } => {
            let user = SessionUser {
                role: Some(role),
                name,
            };
            Session::store(app.session.as_ref(), &token, &user)
                .context("failed to store session")?;
            println!("Session stored; menu: {:?}", app.nav.menu());
        }
        Command::Logout => {
            app.nav.logout().context("failed to clear session")?;
            println!("Logged out");
        }
        Command::Menu { width, .. } => {
            for entry in app.nav.entries() {
                let marker = if entry.active { "*" } else { " " };
                println!("{marker} {:<18} {}", entry.item.path, entry.item.label);
            }
            if app.nav.shows_logout() {
                println!("  (Chiqish)");
            }
            if width < app.nav.mobile_breakpoint() {
                println!("mobile layout: drawer closes on selection");
            }
        }
    }
    Ok(())
}

fn require_staff(session: &Session) -> Result<()> {
    if !Affordances::for_session(session).can_create {
        bail!("this action requires a staff session (mentor or admin)");
    }
    Ok(())
}

async fn apply_fields(app: &App, fields: &[String]) -> Result<()> {
    for assignment in fields {
        let field = DraftField::parse_assignment(assignment)
            .with_context(|| format!("invalid field assignment '{assignment}'"))?;
        app.page.modal.update_field(field).await;
    }
    Ok(())
}

fn report_save(outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Created(Some(project)) => {
            println!("Created {} ({})", project.title, project.id)
        }
        SaveOutcome::Updated(Some(project)) => {
            println!("Updated {} ({})", project.title, project.id)
        }
        SaveOutcome::Created(None) => println!("Created"),
        SaveOutcome::Updated(None) => println!("Updated"),
        SaveOutcome::Invalid(missing) => bail!("required fields missing: {missing:?}"),
        SaveOutcome::Failed(message) => bail!(message),
        other => bail!("save not performed: {other:?}"),
    }
    Ok(())
}

fn print_view(view: &ProjectsView) {
    match view {
        ProjectsView::Loading => println!("..."),
        ProjectsView::Failed { message } => {
            println!("{PAGE_TITLE}: {message}");
            println!("[{RETRY_LABEL}] re-run `dashboard list`");
        }
        ProjectsView::Empty { .. } => println!("{PAGE_TITLE} (0)\n{EMPTY_LABEL}"),
        ProjectsView::Grid {
            count,
            can_create,
            delete_error,
            rows,
        } => {
            println!("{PAGE_TITLE} ({count})");
            if *can_create {
                println!("[+] Loyiha qo'shish");
            }
            if let Some(error) = delete_error {
                println!("! {error}");
            }
            for row in rows {
                let logo = match &row.logo {
                    Logo::Asset(path) => path.clone(),
                    Logo::Glyph(glyph) => format!("[{glyph}]"),
                };
                println!(
                    "{:<26} {:<28} {:<12} {}",
                    row.id,
                    row.title,
                    row.status.label,
                    row.deadline.as_deref().unwrap_or("-")
                );
                println!("    {logo}  {}", row.description);
                if let Some(link) = &row.link {
                    println!("    Saytga o'tish: {link}");
                }
            }
        }
    }
}
