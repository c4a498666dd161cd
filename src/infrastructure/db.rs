use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

/// Column names of `table`, in declaration order
pub async fn table_columns(db: &DatabaseConnection, table: &str) -> Result<Vec<String>, DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            format!("PRAGMA table_info({})", table),
        ))
        .await?;

    rows.iter()
        .map(|row| row.try_get::<String>("", "name"))
        .collect()
}

/// Additive migration for databases created by older builds.
///
/// Checks `PRAGMA table_info` first so re-running at every start is a no-op.
async fn add_column_if_missing(
    db: &DatabaseConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), DbErr> {
    let columns = table_columns(db, table).await?;
    if columns.iter().any(|c| c == column) {
        return Ok(());
    }

    execute(
        db,
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition),
    )
    .await?;
    tracing::info!("Added column {}.{}", table, column);
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Student',
            name TEXT NOT NULL DEFAULT '',
            student_number TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            is_email_verified BOOLEAN NOT NULL DEFAULT 0,
            failed_login_attempts INTEGER NOT NULL DEFAULT 0,
            locked_until TEXT
        )
        "#,
    )
    .await?;

    // Profile and lockout fields arrived after the first release
    add_column_if_missing(db, "users", "name", "TEXT NOT NULL DEFAULT ''").await?;
    add_column_if_missing(db, "users", "student_number", "TEXT NOT NULL DEFAULT ''").await?;
    add_column_if_missing(
        db,
        "users",
        "failed_login_attempts",
        "INTEGER NOT NULL DEFAULT 0",
    )
    .await?;
    add_column_if_missing(db, "users", "locked_until", "TEXT").await?;

    // Create inventory_items table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS inventory_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT NOT NULL,
            item_name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            total_quantity INTEGER NOT NULL,
            available_quantity INTEGER NOT NULL,
            max_per_student INTEGER NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            last_updated TEXT NOT NULL,
            CHECK (available_quantity >= 0 AND available_quantity <= total_quantity)
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_inventory_items_key ON inventory_items(department, item_name);
        CREATE INDEX IF NOT EXISTS idx_inventory_items_department ON inventory_items(department);
        "#,
    )
    .await?;

    // Create cart_items table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS cart_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT NOT NULL,
            item_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            user_email TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_cart_items_user_email ON cart_items(user_email)",
    )
    .await?;

    // Create borrow_forms table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS borrow_forms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference_code TEXT NOT NULL UNIQUE,
            student_name TEXT NOT NULL,
            student_number TEXT NOT NULL,
            student_email TEXT NOT NULL,
            professor_email TEXT NOT NULL,
            subject_code TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            is_approved BOOLEAN,
            processed_at TEXT,
            processed_by TEXT NOT NULL DEFAULT '',
            rejection_reason TEXT NOT NULL DEFAULT '',
            is_issued BOOLEAN NOT NULL DEFAULT 0,
            is_returned BOOLEAN NOT NULL DEFAULT 0
        )
        "#,
    )
    .await?;

    add_column_if_missing(
        db,
        "borrow_forms",
        "processed_by",
        "TEXT NOT NULL DEFAULT ''",
    )
    .await?;
    add_column_if_missing(
        db,
        "borrow_forms",
        "rejection_reason",
        "TEXT NOT NULL DEFAULT ''",
    )
    .await?;

    // Create borrow_form_items table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS borrow_form_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department TEXT NOT NULL,
            item_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            borrow_form_id INTEGER NOT NULL,
            FOREIGN KEY (borrow_form_id) REFERENCES borrow_forms(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE INDEX IF NOT EXISTS idx_borrow_forms_student_email ON borrow_forms(student_email);
        CREATE INDEX IF NOT EXISTS idx_borrow_form_items_form_id ON borrow_form_items(borrow_form_id);
        "#,
    )
    .await?;

    Ok(())
}
