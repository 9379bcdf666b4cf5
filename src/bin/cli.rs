use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use expediente::cli::create_admin;
use expediente::cli::seeder::{clear_seeded_data, seed_database};
use expediente::config::access::AccessConfig;
use expediente::config::database::init_db_pool;

#[derive(Parser)]
#[command(name = "expediente-cli")]
#[command(about = "Expediente CLI - Administrative tools for the personnel-records service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account holding the administrator role
    CreateAdmin {
        /// Display name of the administrator
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed permissions, roles, test users, and a sample roster
    Seed,
    /// Clear seeded test users and the sample roster
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let pool = init_db_pool().await;
    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed => handle_seed(&pool).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::SqlitePool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Display name")
            .interact_text()
            .expect("Failed to read name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    let access = AccessConfig::from_env();

    match create_admin(pool, &access, &name, &email, &password).await {
        Ok(_) => {
            println!("\n✅ Administrator created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {}", name);
            println!("   Role: {}", access.admin_role);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::SqlitePool) {
    let access = AccessConfig::from_env();

    if let Err(e) = seed_database(pool, &access).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::SqlitePool) {
    if let Err(e) = clear_seeded_data(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
