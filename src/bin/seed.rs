use pharma_care_api::{
    db::{DbPool, create_pool, run_migrations},
    models::Role,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@pharmacare.test", "admin123", Role::Admin).await?;
    let seller_id = ensure_user(&pool, "seller@pharmacare.test", "seller123", Role::Seller).await?;
    let user_id = ensure_user(&pool, "user@pharmacare.test", "user123", Role::User).await?;
    seed_categories(&pool).await?;
    seed_medicines(&pool, "seller@pharmacare.test").await?;

    println!("Seed completed. Admin ID: {admin_id}, Seller ID: {seller_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(pool: &DbPool, email: &str, password: &str, role: Role) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(format!("Demo {role}"))
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_categories(pool: &DbPool) -> anyhow::Result<()> {
    for name in ["Tablet", "Syrup", "Capsule", "Injection", "Ointment"] {
        sqlx::query(
            "INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(pool)
        .await?;
    }
    println!("Seeded categories");
    Ok(())
}

async fn seed_medicines(pool: &DbPool, seller_email: &str) -> anyhow::Result<()> {
    let (existing,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM medicines WHERE seller_email = $1")
            .bind(seller_email)
            .fetch_one(pool)
            .await?;
    if existing > 0 {
        println!("Medicines already seeded");
        return Ok(());
    }

    let medicines = vec![
        ("Napa Extra", "Paracetamol + Caffeine", "Tablet", "Beximco", 250),
        ("Seclo 20", "Omeprazole", "Capsule", "Square", 700),
        ("Tusca Plus", "Dextromethorphan", "Syrup", "Incepta", 1200),
        ("Fusid", "Fusidic Acid", "Ointment", "Opsonin", 1850),
    ];

    for (name, generic, category, company, price) in medicines {
        sqlx::query(
            r#"
            INSERT INTO medicines (id, name, generic_name, category, company, price, seller_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(generic)
        .bind(category)
        .bind(company)
        .bind(price as i64)
        .bind(seller_email)
        .execute(pool)
        .await?;
    }

    println!("Seeded medicines");
    Ok(())
}
