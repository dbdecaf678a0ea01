use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use convo_cli::chat_command::{resolve_target, ChatCommand};
use convo_cli::render;
use convo_client::{HttpChatBackend, Role};
use convo_core::{
    ClientConfig, ConfigLoader, ConversationController, FileCredentialStore, Intent, SessionStore,
};
use dialoguer::{Input, Password};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[clap(name = "convo", author, version, about = "Terminal client for the convo chat backend")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, global = true, help = "Path to the YAML configuration file")]
    config: Option<PathBuf>,

    #[clap(long, global = true, help = "Backend base URL, e.g. http://localhost:5000/api")]
    base_url: Option<String>,

    #[clap(long, short, global = true, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account and log in
    Register {
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        email: Option<String>,
    },
    /// Log in with email and password
    Login {
        #[clap(long)]
        email: Option<String>,
    },
    /// Forget the stored credential
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// List conversations, most recent first
    List,
    /// Print one conversation
    Show { id: String },
    /// Send a message, starting a new conversation unless one is given
    Send {
        #[clap(long)]
        conversation: Option<String>,
        #[clap(required = true)]
        text: Vec<String>,
    },
    /// Delete a conversation
    Delete { id: String },
    /// Interactive chat
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        config.validate()?;
    }

    init_logging(&cli, &config)?;
    log::debug!("Using backend at {}", config.base_url);

    let mut controller = build_controller(&config)?;

    match cli.command {
        Commands::Register { username, email } => {
            let username = prompt_or(username, "Username")?;
            let email = prompt_or(email, "Email")?;
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?;

            let identity = controller.register(&username, &email, &password).await?;
            println!("Registered and logged in as {}", render::identity(&identity));
        }
        Commands::Login { email } => {
            let email = prompt_or(email, "Email")?;
            let password = Password::new().with_prompt("Password").interact()?;

            let identity = controller.login(&email, &password).await?;
            println!("Logged in as {}", render::identity(&identity));
        }
        Commands::Logout => {
            controller.dispatch(Intent::Logout).await;
            fail_on_error(&controller)?;
            println!("Logged out");
        }
        Commands::Whoami => {
            require_login(&mut controller).await?;
            if let Some(identity) = controller.session().identity() {
                println!("{}", render::identity(identity));
            }
        }
        Commands::List => {
            require_login(&mut controller).await?;
            controller.dispatch(Intent::LoadList).await;
            fail_on_error(&controller)?;
            println!("{}", render::sidebar(controller.state().conversations(), None));
        }
        Commands::Show { id } => {
            require_login(&mut controller).await?;
            controller.dispatch(Intent::Select(id)).await;
            fail_on_error(&controller)?;
            print_detail(&controller);
        }
        Commands::Send { conversation, text } => {
            require_login(&mut controller).await?;
            if let Some(id) = conversation {
                controller.dispatch(Intent::Select(id)).await;
                fail_on_error(&controller)?;
            }

            controller.dispatch(Intent::Send(text.join(" "))).await;
            fail_on_error(&controller)?;

            let state = controller.state();
            if let Some(reply) = state.messages().last().filter(|m| m.role == Role::Assistant) {
                println!("{}", reply.content);
            }
            if let Some(id) = state.active_id() {
                eprintln!("(conversation {})", id);
            }
        }
        Commands::Delete { id } => {
            require_login(&mut controller).await?;
            controller.dispatch(Intent::Delete(id.clone())).await;
            fail_on_error(&controller)?;
            println!("Deleted conversation {}", id);
        }
        Commands::Chat => run_chat(&mut controller).await?,
    }

    Ok(())
}

/// Interactive sessions log to a file so the transcript stays readable;
/// one-shot commands log to stderr.
fn init_logging(cli: &Cli, config: &ClientConfig) -> Result<()> {
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str())
        .parse()
        .unwrap_or(LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);

    if matches!(cli.command, Commands::Chat) {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.file)
            .with_context(|| {
                format!("Failed to open log file {}", config.logging.file.display())
            })?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

fn build_controller(config: &ClientConfig) -> Result<ConversationController> {
    let credentials = Arc::new(FileCredentialStore::new(config.credential_path()?));
    log::debug!("Credential file: {}", credentials.path().display());

    let backend = HttpChatBackend::new(config.base_url.clone(), credentials.clone())
        .with_timeout(Duration::from_secs(config.timeout_secs))
        .with_auth_header(config.auth_header.clone());

    Ok(ConversationController::new(
        Box::new(backend),
        SessionStore::new(credentials),
    ))
}

fn prompt_or(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

async fn require_login(controller: &mut ConversationController) -> Result<()> {
    controller.restore_session().await;
    if controller.session().is_authenticated() {
        return Ok(());
    }

    match controller.session().restore_notice() {
        Some(notice) => bail!("not logged in ({}); run `convo login`", notice),
        None => bail!("not logged in; run `convo login`"),
    }
}

fn fail_on_error(controller: &ConversationController) -> Result<()> {
    match controller.state().error() {
        Some(error) => bail!("{}", error),
        None => Ok(()),
    }
}

fn print_detail(controller: &ConversationController) {
    let state = controller.state();
    println!("{}", render::header(state));
    println!("{}", render::transcript(state.messages()));
}

fn print_list(controller: &ConversationController) {
    let state = controller.state();
    println!("{}", render::sidebar(state.conversations(), state.active_id()));
}

async fn report_error(controller: &mut ConversationController) {
    if let Some(error) = controller.state().error().map(str::to_string) {
        println!("{}", render::error_banner(&error));
        controller.dispatch(Intent::DismissError).await;
    }
}

async fn run_chat(controller: &mut ConversationController) -> Result<()> {
    require_login(controller).await?;
    if let Some(identity) = controller.session().identity() {
        println!("Logged in as {}", render::identity(identity));
    }

    controller.dispatch(Intent::LoadList).await;
    report_error(controller).await;
    print_list(controller);
    println!();
    print_detail(controller);
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ChatCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", render::error_banner(&message));
                continue;
            }
        };

        match command {
            ChatCommand::Empty => {}
            ChatCommand::Help => println!("{}", render::HELP),
            ChatCommand::Quit => break,
            ChatCommand::List => {
                controller.dispatch(Intent::LoadList).await;
                print_list(controller);
            }
            ChatCommand::New => {
                controller.dispatch(Intent::NewChat).await;
                print_detail(controller);
            }
            ChatCommand::Open(target) => {
                match resolve_target(&target, controller.state().conversations()) {
                    Some(id) => {
                        controller.dispatch(Intent::Select(id)).await;
                        if controller.state().error().is_none() {
                            print_detail(controller);
                        }
                    }
                    None => println!(
                        "{}",
                        render::error_banner(&format!("No conversation matches '{}'", target))
                    ),
                }
            }
            ChatCommand::Delete(target) => {
                match resolve_target(&target, controller.state().conversations()) {
                    Some(id) => {
                        controller.dispatch(Intent::Delete(id)).await;
                        if controller.state().error().is_none() {
                            println!("Deleted.");
                            print_list(controller);
                        }
                    }
                    None => println!(
                        "{}",
                        render::error_banner(&format!("No conversation matches '{}'", target))
                    ),
                }
            }
            ChatCommand::Logout => {
                controller.dispatch(Intent::Logout).await;
                report_error(controller).await;
                println!("Logged out");
                break;
            }
            ChatCommand::Message(text) => {
                let before = controller.state().messages().len();
                let was_new = controller.state().active_id().is_none();

                controller.dispatch(Intent::Send(text)).await;

                let state = controller.state();
                if state.error().is_none() {
                    for message in state.messages().iter().skip(before + 1) {
                        println!("{}", render::message(message));
                    }
                    if was_new && state.active_id().is_some() {
                        println!("{}", render::header(state));
                    }
                }
            }
        }

        report_error(controller).await;
    }

    Ok(())
}
