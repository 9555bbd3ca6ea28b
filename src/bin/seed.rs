use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use artisan_market_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", "admin").await?;
    let seller_id =
        ensure_user(&pool, "seller@example.com", "seller123", "Kala Crafts", "seller").await?;
    let customer_id =
        ensure_user(&pool, "buyer@example.com", "buyer123", "Asha Rao", "customer").await?;
    seed_products(&pool, seller_id).await?;

    println!("Seed completed. Admin: {admin_id}, Seller: {seller_id}, Customer: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    display_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, display_name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(display_name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool, seller_id: Uuid) -> anyhow::Result<()> {
    let products: Vec<(&str, &str, &str, i64)> = vec![
        ("Clay Vase", "pottery", "Hand-thrown terracotta vase", 45_000),
        ("Brass Lamp", "metalwork", "Etched brass oil lamp", 120_000),
        ("Silver Anklet", "jewellery", "Oxidised silver anklet", 80_000),
        ("Block-print Scarf", "textiles", "Indigo block-printed cotton", 30_000),
    ];

    for (name, category, desc, price) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, seller_id, name, category, description, price, image, status)
            SELECT $1, $2, $3, $4, $5, $6, $7, 'approved'
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $3 AND seller_id = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(name)
        .bind(category)
        .bind(desc)
        .bind(price)
        .bind(format!("/uploads/{}.jpg", name.to_lowercase().replace(' ', "-")))
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
