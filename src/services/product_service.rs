use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::products::{CreateProductRequest, ProductQuery, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_seller},
    models::{Product, product_status},
};

pub async fn list_products(pool: &DbPool, query: ProductQuery) -> AppResult<Vec<Product>> {
    let search = query.search.filter(|s| !s.is_empty());
    let items: Vec<Product> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL
               OR name ILIKE '%' || $3 || '%'
               OR description ILIKE '%' || $3 || '%')
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.category.filter(|s| !s.is_empty()))
    .bind(query.status.filter(|s| !s.is_empty()))
    .bind(search)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn get_product(pool: &DbPool, id: Uuid) -> AppResult<Product> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    product.ok_or(AppError::NotFound)
}

pub async fn create_product(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    ensure_seller(user)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let product: Product = sqlx::query_as(
        r#"
        INSERT INTO products (id, seller_id, name, category, description, price, image, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(&payload.image)
    .bind(product_status::PENDING)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    ensure_seller(user)?;

    let existing: Option<Product> =
        sqlx::query_as("SELECT * FROM products WHERE id = $1 AND seller_id = $2")
            .bind(id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let description = payload.description.or(existing.description);
    let price = payload.price.unwrap_or(existing.price);
    let image = payload.image.unwrap_or(existing.image);

    if price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let product: Product = sqlx::query_as(
        r#"
        UPDATE products
        SET name = $2, category = $3, description = $4, price = $5, image = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(category)
    .bind(description)
    .bind(price)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &DbPool, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_seller(user)?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND seller_id = $2")
        .bind(id)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

pub async fn set_approval(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    status: &str,
) -> AppResult<Product> {
    ensure_admin(user)?;
    debug_assert!(status == product_status::APPROVED || status == product_status::REJECTED);

    let product: Option<Product> =
        sqlx::query_as("UPDATE products SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "product_approval",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "status": product.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product)
}
