use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use toolroom::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use toolroom::db;
use toolroom::domain::{DomainError, Role};
use toolroom::models::user;
use toolroom::services::account_service::{
    self, LoginError, MAX_FAILED_LOGIN_ATTEMPTS, RegisterStudent,
};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn student(username: &str, email: &str) -> RegisterStudent {
    RegisterStudent {
        username: username.to_string(),
        email: email.to_string(),
        password: "lab2025pass".to_string(),
        name: "Maria Santos".to_string(),
        student_number: "20230001".to_string(),
    }
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password1";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
    assert!(hash_password("   ").is_err());
}

#[tokio::test]
async fn test_jwt_creation_and_verification() {
    let token = create_jwt("admin1@ue.edu.ph", "admin1", "Administrator")
        .expect("Failed to create JWT");
    assert!(!token.is_empty());

    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "admin1@ue.edu.ph");
    assert_eq!(claims.username, "admin1");
    assert_eq!(claims.role(), Some(Role::Administrator));

    assert!(decode_jwt("not.a.token").is_err());
}

#[tokio::test]
async fn test_register_student_validation() {
    let db = setup_test_db().await;

    let account = account_service::register_student(&db, student("maria", "Maria@UE.edu.ph"))
        .await
        .unwrap();
    assert_eq!(account.role, "Student");
    assert_eq!(account.email, "maria@ue.edu.ph");
    assert!(!account.is_email_verified);
    assert_ne!(account.password_hash, "lab2025pass");

    let err = account_service::register_student(&db, student("maria2", "maria@ue.edu.ph"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ref m) if m == "Email is already registered."));

    let err = account_service::register_student(&db, student("maria", "other@ue.edu.ph"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ref m) if m == "Username is already registered."));

    let mut weak = student("pedro", "pedro@ue.edu.ph");
    weak.password = "abcdefgh".to_string();
    let err = account_service::register_student(&db, weak).await.unwrap_err();
    assert!(
        matches!(err, DomainError::Validation(ref m) if m == "Password must contain at least one number.")
    );

    let err = account_service::register_student(&db, student("pedro", "pedro@ue"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    let db = setup_test_db().await;
    account_service::register_student(&db, student("maria", "maria@ue.edu.ph"))
        .await
        .unwrap();

    let (token, account) = account_service::login(&db, "maria", "lab2025pass")
        .await
        .unwrap();
    assert_eq!(account.username, "maria");
    let claims = decode_jwt(&token).unwrap();
    assert_eq!(claims.sub, "maria@ue.edu.ph");
    assert_eq!(claims.role(), Some(Role::Student));

    assert!(
        account_service::login(&db, " maria@ue.edu.ph ", "lab2025pass")
            .await
            .is_ok()
    );

    assert!(matches!(
        account_service::login(&db, "ghost", "lab2025pass").await,
        Err(LoginError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_login_with_email_as_typed_at_registration() {
    let db = setup_test_db().await;
    account_service::register_student(&db, student("maria", "Maria@UE.edu.ph"))
        .await
        .unwrap();

    let (token, account) = account_service::login(&db, "Maria@UE.edu.ph", "lab2025pass")
        .await
        .unwrap();
    assert_eq!(account.email, "maria@ue.edu.ph");
    assert_eq!(decode_jwt(&token).unwrap().sub, "maria@ue.edu.ph");

    let found = account_service::find_by_email(&db, "MARIA@ue.edu.ph")
        .await
        .unwrap();
    assert_eq!(found.map(|a| a.username), Some("maria".to_string()));

    // Usernames stay exact
    assert!(matches!(
        account_service::login(&db, "MARIA", "lab2025pass").await,
        Err(LoginError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let db = setup_test_db().await;
    let account = account_service::register_student(&db, student("maria", "maria@ue.edu.ph"))
        .await
        .unwrap();

    for _ in 1..MAX_FAILED_LOGIN_ATTEMPTS {
        assert!(matches!(
            account_service::login(&db, "maria", "wrong1").await,
            Err(LoginError::InvalidCredentials)
        ));
    }

    let stored = user::Entity::find_by_id(account.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.failed_login_attempts, MAX_FAILED_LOGIN_ATTEMPTS - 1);

    // The last allowed failure locks the account
    assert!(matches!(
        account_service::login(&db, "maria", "wrong1").await,
        Err(LoginError::Locked(_))
    ));

    // Even the right password is refused while locked
    assert!(matches!(
        account_service::login(&db, "maria", "lab2025pass").await,
        Err(LoginError::Locked(_))
    ));

    // Once the lock has passed, a correct login clears it
    let mut expired: user::ActiveModel = user::Entity::find_by_id(account.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap()
        .into();
    expired.locked_until = Set(Some(
        (chrono::Utc::now() - chrono::Duration::minutes(1)).to_rfc3339(),
    ));
    expired.update(&db).await.unwrap();

    account_service::login(&db, "maria", "lab2025pass")
        .await
        .unwrap();
    let stored = user::Entity::find_by_id(account.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.failed_login_attempts, 0);
    assert!(stored.locked_until.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_still_lock() {
    let db = setup_test_db().await;
    let account = account_service::register_student(&db, student("maria", "maria@ue.edu.ph"))
        .await
        .unwrap();

    let attempts: Vec<_> = (0..12)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { account_service::login(&db, "maria", "wrong1").await })
        })
        .collect();

    let mut locked = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Err(LoginError::Locked(_)) => locked += 1,
            Err(LoginError::InvalidCredentials) => {}
            other => panic!("unexpected login outcome: {:?}", other.map(|(_, a)| a.username)),
        }
    }
    assert!(locked >= 1);

    let stored = user::Entity::find_by_id(account.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.locked_until.is_some());
    assert!(stored.failed_login_attempts < MAX_FAILED_LOGIN_ATTEMPTS);

    assert!(matches!(
        account_service::login(&db, "maria", "lab2025pass").await,
        Err(LoginError::Locked(_))
    ));
}

#[tokio::test]
async fn test_schema_has_lockout_columns() {
    let db = setup_test_db().await;

    let columns = db::table_columns(&db, "users").await.unwrap();
    assert!(columns.iter().any(|c| c == "failed_login_attempts"));
    assert!(columns.iter().any(|c| c == "locked_until"));

    let columns = db::table_columns(&db, "borrow_forms").await.unwrap();
    assert!(columns.iter().any(|c| c == "rejection_reason"));
}
