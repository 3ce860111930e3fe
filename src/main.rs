use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use repairdesk::config::{BASE_URL_ENV, SESSION_FILE_ENV};
use repairdesk::forms::{
    self, AppointmentForm, CredentialsForm, PaymentForm, RepairForm, ReviewForm, submit_appointment, submit_payment,
    submit_repair, submit_review,
};
use repairdesk::types::{AppointmentUpdate, NewService, RepairUpdate, Status};
use repairdesk::{ApiClient, ApiError, AuthState, ClientConfig, FileSessionStore, dashboard, docs};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `repairdesk login` first")]
    NotLoggedIn,
    #[error("session expired or rejected ({0}); run `repairdesk login` again")]
    SessionRejected(String),
    #[error("unknown docs category '{0}'")]
    UnknownCategory(String),
    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),
    #[error("nothing to update; pass at least one of the update flags")]
    EmptyUpdate,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// A 401 on a call made with the stored token means the session is stale.
    fn for_session(self) -> Self {
        match self {
            Self::Api(error) if error.is_unauthorized() => Self::SessionRejected(error.to_string()),
            other => other,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repairdesk", about = "Repair service API client and endpoint docs")]
struct Cli {
    /// API root.
    #[arg(long, global = true, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Persisted session location.
    #[arg(long, global = true, env = SESSION_FILE_ENV)]
    session_file: Option<PathBuf>,

    /// Log request details to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the endpoint documentation.
    Docs {
        #[arg(long, conflicts_with = "endpoint")]
        category: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
    },
    Login(CredentialArgs),
    Register(CredentialArgs),
    #[command(flatten)]
    Session(SessionCommand),
}

/// Commands that run against the stored session.
#[derive(Subcommand, Debug)]
enum SessionCommand {
    Logout,
    Whoami,
    Services(ServicesCommand),
    Repairs(RepairsCommand),
    Payments(PaymentsCommand),
    Appointments(AppointmentsCommand),
    Reviews(ReviewsCommand),
    /// Repairs, appointments and payments at a glance.
    Dashboard,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "REPAIRDESK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct ServicesCommand {
    #[command(subcommand)]
    command: ServicesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ServicesSubcommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        /// Minutes.
        #[arg(long)]
        duration: u32,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct RepairsCommand {
    #[command(subcommand)]
    command: RepairsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RepairsSubcommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long, default_value = "")]
        service: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        estimated_cost: String,
    },
    Update {
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        final_cost: Option<f64>,
    },
    /// Set a repair's status (admin).
    Status {
        id: String,
        status: String,
    },
}

#[derive(Args, Debug)]
struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PaymentsSubcommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long, default_value = "")]
        repair: String,
        /// credit_card, debit_card, paypal or cash.
        #[arg(long, default_value = "")]
        method: String,
        /// Defaults to the repair's final cost, or its estimate.
        #[arg(long)]
        amount: Option<String>,
    },
}

#[derive(Args, Debug)]
struct AppointmentsCommand {
    #[command(subcommand)]
    command: AppointmentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppointmentsSubcommand {
    List,
    Create {
        #[arg(long, default_value = "")]
        repair: String,
        /// YYYY-MM-DD or RFC 3339.
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Update {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Cancel {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewsSubcommand {
    List {
        /// Only reviews for this service.
        #[arg(long)]
        service: Option<String>,
    },
    Create {
        #[arg(long, default_value = "")]
        service: String,
        #[arg(long, default_value = "")]
        rating: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
}

struct CliContext {
    api: ApiClient,
    auth: AuthState<FileSessionStore>,
}

impl CliContext {
    fn open(config: ClientConfig) -> Result<Self, CliError> {
        let api = ApiClient::from_config(&config)?;
        let auth = AuthState::restored(FileSessionStore::new(config.session_file));
        Ok(Self { api, auth })
    }

    /// Client carrying the session token; errors when logged out.
    fn authed(&self) -> Result<ApiClient, CliError> {
        if !self.auth.is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }
        Ok(self.auth.client(&self.api))
    }

    /// Client carrying the token if there is one.
    fn public(&self) -> ApiClient {
        self.auth.client(&self.api)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(cli.base_url.as_deref(), cli.session_file)?;

    match cli.command {
        Command::Docs { category, endpoint } => run_docs(&config.base_url, category.as_deref(), endpoint.as_deref()),
        Command::Login(args) => run_login(&mut CliContext::open(config)?, args).await,
        Command::Register(args) => {
            let ctx = CliContext::open(config)?;
            let form = CredentialsForm { email: args.email, password: args.password };
            let ack = forms::submit_registration(&ctx.api, &form).await?;
            println!("{}", if ack.message.is_empty() { "registered" } else { ack.message.as_str() });
            Ok(())
        }
        Command::Session(command) => {
            let mut ctx = CliContext::open(config)?;
            run_session(&mut ctx, command).await.map_err(CliError::for_session)
        }
    }
}

/// Flag values (clap folds the env vars into them) win over the defaults.
fn resolve_config(base_url: Option<&str>, session_file: Option<PathBuf>) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_lookup(|key| match key {
        BASE_URL_ENV => base_url.map(str::to_owned),
        SESSION_FILE_ENV => None,
        other => std::env::var(other).ok(),
    })?;
    if let Some(path) = session_file {
        config.session_file = path;
    }
    Ok(config)
}

async fn run_session(ctx: &mut CliContext, command: SessionCommand) -> Result<(), CliError> {
    match command {
        SessionCommand::Logout => {
            ctx.auth.logout();
            println!("logged out");
            Ok(())
        }
        SessionCommand::Whoami => match ctx.auth.user() {
            Some(user) => print_json(user),
            None => Err(CliError::NotLoggedIn),
        },
        SessionCommand::Services(cmd) => run_services(ctx, cmd).await,
        SessionCommand::Repairs(cmd) => run_repairs(ctx, cmd).await,
        SessionCommand::Payments(cmd) => run_payments(ctx, cmd).await,
        SessionCommand::Appointments(cmd) => run_appointments(ctx, cmd).await,
        SessionCommand::Reviews(cmd) => run_reviews(ctx, cmd).await,
        SessionCommand::Dashboard => {
            let overview = dashboard::load(&ctx.authed()?).await;
            if overview.is_unauthorized() {
                return Err(CliError::SessionRejected("401".to_owned()));
            }
            print!("{}", overview.render(ctx.auth.user()));
            Ok(())
        }
    }
}

fn run_docs(base_url: &str, category: Option<&str>, endpoint: Option<&str>) -> Result<(), CliError> {
    if let Some(id) = endpoint {
        let endpoint = docs::find(id).ok_or_else(|| CliError::UnknownEndpoint(id.to_owned()))?;
        print!("{}", docs::render_endpoint(base_url, endpoint));
    } else if let Some(id) = category {
        let category = docs::category(id).ok_or_else(|| CliError::UnknownCategory(id.to_owned()))?;
        print!("{}", docs::render_category(base_url, category));
    } else {
        print!("{}", docs::render_index(base_url));
    }
    Ok(())
}

async fn run_login(ctx: &mut CliContext, args: CredentialArgs) -> Result<(), CliError> {
    let form = CredentialsForm { email: args.email, password: args.password };
    let session = forms::submit_login(&mut ctx.auth, &ctx.api, &form).await?;
    let role = if session.user.is_admin { " (admin)" } else { "" };
    println!("logged in as {}{role}", session.user.email);
    Ok(())
}

async fn run_services(ctx: &CliContext, cmd: ServicesCommand) -> Result<(), CliError> {
    match cmd.command {
        ServicesSubcommand::List => print_json(&ctx.public().list_services().await?),
        ServicesSubcommand::Get { id } => print_json(&ctx.public().get_service(&id).await?),
        ServicesSubcommand::Create { name, description, price, duration } => {
            let body = NewService { name, description, price, duration };
            print_json(&ctx.authed()?.create_service(&body).await?)
        }
        ServicesSubcommand::Delete { id } => print_json(&ctx.authed()?.delete_service(&id).await?),
    }
}

async fn run_repairs(ctx: &CliContext, cmd: RepairsCommand) -> Result<(), CliError> {
    let client = ctx.authed()?;
    match cmd.command {
        RepairsSubcommand::List => print_json(&client.list_repairs().await?),
        RepairsSubcommand::Get { id } => print_json(&client.get_repair(&id).await?),
        RepairsSubcommand::Create { service, description, estimated_cost } => {
            let form = RepairForm { service_id: service, description, estimated_cost };
            print_json(&submit_repair(&client, &form).await?)
        }
        RepairsSubcommand::Update { id, status, final_cost } => {
            if status.is_none() && final_cost.is_none() {
                return Err(CliError::EmptyUpdate);
            }
            let update = RepairUpdate { status: status.map(Status::new), final_cost };
            print_json(&client.update_repair(&id, &update).await?)
        }
        RepairsSubcommand::Status { id, status } => {
            print_json(&client.update_repair_status(&id, Status::new(status)).await?)
        }
    }
}

async fn run_payments(ctx: &CliContext, cmd: PaymentsCommand) -> Result<(), CliError> {
    let client = ctx.authed()?;
    match cmd.command {
        PaymentsSubcommand::List => print_json(&client.list_payments().await?),
        PaymentsSubcommand::Get { id } => print_json(&client.get_payment(&id).await?),
        PaymentsSubcommand::Create { repair, method, amount } => {
            let form = match amount {
                Some(amount) => PaymentForm { repair_id: repair, amount, method },
                None if repair.trim().is_empty() => PaymentForm { repair_id: repair, amount: String::new(), method },
                None => {
                    let repair = client.get_repair(repair.trim()).await?;
                    PaymentForm::for_repair(&repair, &method)
                }
            };
            print_json(&submit_payment(&client, &form).await?)
        }
    }
}

async fn run_appointments(ctx: &CliContext, cmd: AppointmentsCommand) -> Result<(), CliError> {
    let client = ctx.authed()?;
    match cmd.command {
        AppointmentsSubcommand::List => print_json(&client.list_appointments().await?),
        AppointmentsSubcommand::Create { repair, date, notes } => {
            let form = AppointmentForm { repair_id: repair, date, notes };
            print_json(&submit_appointment(&client, &form).await?)
        }
        AppointmentsSubcommand::Update { id, date, status, notes } => {
            let scheduled_date_time = match date {
                Some(raw) => Some(forms::normalize_date(&raw).ok_or_else(|| {
                    ApiError::Validation("Appointment date must be YYYY-MM-DD or an RFC 3339 timestamp".to_owned())
                })?),
                None => None,
            };
            let update = AppointmentUpdate { scheduled_date_time, status: status.map(Status::new), notes };
            if update == AppointmentUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&client.update_appointment(&id, &update).await?)
        }
        AppointmentsSubcommand::Cancel { id } => print_json(&client.cancel_appointment(&id).await?),
    }
}

async fn run_reviews(ctx: &CliContext, cmd: ReviewsCommand) -> Result<(), CliError> {
    match cmd.command {
        ReviewsSubcommand::List { service: Some(service) } => {
            print_json(&ctx.public().list_service_reviews(&service).await?)
        }
        ReviewsSubcommand::List { service: None } => print_json(&ctx.public().list_reviews().await?),
        ReviewsSubcommand::Create { service, rating, comment } => {
            let form = ReviewForm { service_id: service, rating, comment };
            print_json(&submit_review(&ctx.authed()?, &form).await?)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
