//! Seed the database with demo accounts and a sample conversation.
//!
//! Safe to run repeatedly: existing accounts are left untouched and the
//! sample conversation is only given a first message when it is empty.

use carebridge::backend::auth::passwords::PasswordHasher;
use carebridge::backend::auth::users::{create_user, get_user_by_email, NewUser, User};
use carebridge::backend::messaging::{conversations, messages};
use carebridge::backend::server::config::{connect_database, AppConfig};
use carebridge::backend::RoomRegistry;
use carebridge::shared::user::Role;
use sqlx::SqlitePool;

const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: &[(&str, &str, Role)] = &[
    ("patient@example.com", "Test Patient", Role::Patient),
    ("patient2@example.com", "Second Patient", Role::Patient),
    ("provider@example.com", "Test Provider", Role::HealthcareProvider),
    ("doctor@example.com", "Dr. Tanaka", Role::HealthcareProvider),
    ("nurse@example.com", "Nurse Sato", Role::HealthcareProvider),
    ("admin@example.com", "Administrator", Role::Admin),
];

async fn ensure_user(
    pool: &SqlitePool,
    hasher: &PasswordHasher,
    email: &str,
    name: &str,
    role: Role,
) -> Result<User, Box<dyn std::error::Error>> {
    if let Some(existing) = get_user_by_email(pool, email).await? {
        println!("  = {email} already exists (id {})", existing.id);
        return Ok(existing);
    }

    let password_hash = hasher.hash(DEMO_PASSWORD)?;
    let user = create_user(
        pool,
        NewUser {
            email,
            password_hash: &password_hash,
            name: Some(name),
            role,
            language: "ja",
        },
    )
    .await?;
    println!("  + {email} ({role}) created with id {}", user.id);
    Ok(user)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    println!("Seeding database at {}", config.database_url);

    let pool = connect_database(&config).await?;
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    println!("\nUsers:");
    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for (email, name, role) in DEMO_USERS {
        users.push(ensure_user(&pool, &hasher, email, name, *role).await?);
    }

    let patient = &users[0];
    let provider = &users[2];

    println!("\nConversations:");
    let (conversation, created) =
        conversations::create(&pool, Some(patient.id), Some(provider.id)).await?;
    println!(
        "  {} conversation {} between {} and {}",
        if created { "+" } else { "=" },
        conversation.id,
        patient.email,
        provider.email
    );

    let history = messages::list(&pool, conversation.id, patient.id).await?;
    if history.is_empty() {
        let rooms = RoomRegistry::new();
        messages::post(
            &pool,
            &rooms,
            Some(conversation.id),
            provider.id,
            Some("Hello! How are you feeling today?"),
        )
        .await?;
        println!("  + welcome message posted");
    }

    println!("\nDone. Every demo account uses the password \"{DEMO_PASSWORD}\".");
    Ok(())
}
