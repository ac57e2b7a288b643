//! `myblog` terminal front end.
//!
//! # Responsibility
//! - Map each subcommand onto a path plus a short script of shell actions.
//! - Print notifications to stderr and the resulting view to stdout.
//!
//! # Invariants
//! - Exit status is non-zero after an error notification, a validation
//!   failure or a redirect away from the requested view.

mod render;

use clap::{Parser, Subcommand};
use log::{info, warn};
use myblog_core::view::home::DEFAULT_PAGE_SIZE;
use myblog_core::{
    init_logging, Action, App, ClientConfig, HttpTransport, NotificationLog, Route,
    SqliteSessionStore,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "myblog")]
#[command(about = "Terminal client for the My Blog API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (overrides MYBLOG_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Directory holding the session store and logs (overrides MYBLOG_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides MYBLOG_LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and store the session
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// List posts, one page at a time
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// One of 5, 10, 15, 20
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Mark a listed post as liked (local only, repeatable)
        #[arg(long = "like", value_name = "ID")]
        likes: Vec<String>,
    },

    /// Show one post
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Publish a new post
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,
    },

    /// Update an existing post; omitted fields keep their current value
    Edit {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a post you authored
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Render any route, e.g. `/post/42`
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

type CliApp = App<HttpTransport, SqliteSessionStore, NotificationLog>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_logging(config.log_level, &config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let store = match SqliteSessionStore::open(config.session_db_path()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: cannot open session store: {err}");
            return ExitCode::FAILURE;
        }
    };
    let transport = match HttpTransport::new(config.api_base_url.clone(), config.request_timeout)
    {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("error: cannot build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (path, script) = match plan(cli.command) {
        Ok(plan) => plan,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    let mut app = App::open(transport, store, NotificationLog::new(), &path);
    let reached =
        matches!(script, Script::Logout) || Route::parse(&path).as_ref() == Some(app.route());
    let completed = reached && script.run(&mut app);

    let had_errors = app.notifier().has_errors();
    for notification in app.notifier().drain() {
        eprintln!("{}", render::render_notification(&notification));
    }
    print!("{}", render::render(&app));

    let ok = completed && !had_errors;
    info!(
        "event=cli_exit module=cli status={} route={}",
        if ok { "ok" } else { "error" },
        app.route().path()
    );
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, String> {
    let mut config = ClientConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_base_url(url).map_err(|err| err.to_string())?;
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir).map_err(|err| err.to_string())?;
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level).map_err(|err| err.to_string())?;
    }
    Ok(config)
}

/// Actions replayed against the shell after the first navigation.
enum Script {
    /// Submit the mounted form; success means landing on `expect`.
    Submit {
        fields: Vec<(&'static str, String)>,
        expect: Route,
    },
    Logout,
    Browse {
        page: u32,
        page_size: u32,
        likes: Vec<String>,
    },
    Delete {
        confirmed: bool,
    },
    View,
}

fn plan(command: Commands) -> Result<(String, Script), String> {
    let planned = match command {
        Commands::Login { email, password } => (
            Route::Login.path(),
            Script::Submit {
                fields: vec![("email", email), ("password", password_or_prompt(password)?)],
                expect: Route::Home,
            },
        ),
        Commands::Register {
            username,
            email,
            password,
        } => (
            Route::Register.path(),
            Script::Submit {
                fields: vec![
                    ("username", username),
                    ("email", email),
                    ("password", password_or_prompt(password)?),
                ],
                expect: Route::Home,
            },
        ),
        Commands::Logout => (Route::Create.path(), Script::Logout),
        Commands::List {
            page,
            page_size,
            likes,
        } => (
            Route::Home.path(),
            Script::Browse {
                page,
                page_size,
                likes,
            },
        ),
        Commands::Show { id } => (Route::Post(id).path(), Script::View),
        Commands::Create { title, content } => (
            Route::Create.path(),
            Script::Submit {
                fields: vec![("title", title), ("content", content)],
                expect: Route::Home,
            },
        ),
        Commands::Edit { id, title, content } => {
            let fields = [("title", title), ("content", content)]
                .into_iter()
                .filter_map(|(field, value)| value.map(|value| (field, value)))
                .collect();
            (
                Route::Edit(id.clone()).path(),
                Script::Submit {
                    fields,
                    expect: Route::Post(id),
                },
            )
        }
        Commands::Delete { id, yes } => (
            Route::Post(id).path(),
            Script::Delete { confirmed: yes },
        ),
        Commands::Open { path } => (path, Script::View),
    };
    Ok(planned)
}

impl Script {
    fn run(self, app: &mut CliApp) -> bool {
        match self {
            Self::Submit { fields, expect } => {
                for (field, value) in fields {
                    app.dispatch(Action::EditField {
                        field: field.to_string(),
                        value,
                    });
                }
                app.dispatch(Action::Submit);
                app.route() == &expect
            }
            Self::Logout => {
                app.dispatch(Action::Logout);
                true
            }
            Self::Browse {
                page,
                page_size,
                likes,
            } => {
                let resized =
                    page_size == DEFAULT_PAGE_SIZE || app.dispatch(Action::SetPageSize(page_size));
                if !resized {
                    eprintln!("error: page size must be one of 5, 10, 15, 20");
                    return false;
                }
                if page != 1 && !app.dispatch(Action::GoToPage(page)) {
                    eprintln!("error: page {page} is out of range");
                    return false;
                }
                likes.into_iter().all(|id| {
                    let liked = app.dispatch(Action::ToggleLike(id.clone()));
                    if !liked {
                        eprintln!("error: post {id} is not on this page");
                    }
                    liked
                })
            }
            Self::Delete { confirmed } => {
                if !app.dispatch(Action::OpenDeleteDialog) {
                    eprintln!("error: only the author can delete this post");
                    return false;
                }
                if !confirmed && !confirm_delete() {
                    app.dispatch(Action::CloseDeleteDialog);
                    return true;
                }
                app.dispatch(Action::ConfirmDelete);
                app.route() == &Route::Home
            }
            Self::View => true,
        }
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String, String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    let _ = io::stderr().flush();
    read_line().map_err(|err| format!("cannot read password: {err}"))
}

fn confirm_delete() -> bool {
    eprint!("Are you sure you want to delete this post? [y/N] ");
    let _ = io::stderr().flush();
    match read_line() {
        Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(err) => {
            warn!("event=confirm_prompt module=cli status=error error={err}");
            false
        }
    }
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
