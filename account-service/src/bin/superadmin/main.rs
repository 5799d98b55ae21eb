//! Operator tool for creating and removing superadmin accounts.

use account_service::config::Config;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::Password;
use account_service::domain::user::models::PersonName;
use account_service::domain::user::models::User;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::roles::Role;
use account_service::domain::user::roles::RoleSet;
use account_service::outbound::repositories::PostgresUserRepository;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use dialoguer::Password as PasswordPrompt;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "superadmin", about = "Manage superadmin accounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a superadmin, prompting for its password
    Create {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Super")]
        name: String,
        #[arg(long, default_value = "Admin")]
        surname: String,
    },
    /// Permanently remove the user with the given email
    Delete {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "superadmin=info,account_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await
        .context("failed to connect to the database")?;
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let repository = PostgresUserRepository::new(pg_pool);

    match cli.command {
        Command::Create {
            email,
            name,
            surname,
        } => create(&repository, email, name, surname).await,
        Command::Delete { email } => delete(&repository, email).await,
    }
}

async fn create(
    repository: &PostgresUserRepository,
    email: String,
    name: String,
    surname: String,
) -> Result<()> {
    let email = EmailAddress::new(email)?;
    let name = PersonName::new("Name", name)?;
    let surname = PersonName::new("Surname", surname)?;

    if repository.find_by_email(email.as_str()).await?.is_some() {
        bail!("user with email {} already exists", email);
    }

    let password = PasswordPrompt::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .validate_with(|input: &String| -> Result<(), String> {
            Password::new(input.clone())
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact()?;
    let password = Password::new(password)?;

    let password_hash = auth::PasswordHasher::new().hash(password.expose())?;
    let user = User::register(
        name,
        surname,
        email,
        password_hash,
        RoleSet::of(Role::Superadmin),
    );

    let user = repository.create(user).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "Superadmin created");
    Ok(())
}

async fn delete(repository: &PostgresUserRepository, email: String) -> Result<()> {
    let email = EmailAddress::new(email)?;

    match repository.delete_by_email(&email).await? {
        Some(user_id) => {
            tracing::info!(user_id = %user_id, email = %email, "User deleted");
            Ok(())
        }
        None => bail!("no user with email {}", email),
    }
}
