use nas_backend::config::JwtConfig;
use nas_backend::model::user::UserRole;
use nas_backend::util::jwt::*;

fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::new(JwtConfig::default())
}

fn config_with_secret(secret: &str) -> JwtConfig {
    JwtConfig {
        jwt_secret: secret.to_string(),
        access_token_expiration: 15,
        refresh_token_expiration: 10080,
    }
}

struct TestUser {
    id: String,
    email: String,
    role: UserRole,
}

impl TestUser {
    fn applicant() -> Self {
        Self {
            id: "65f0c1d2e3a4b5c6d7e8f901".to_string(),
            email: "applicant@university.edu".to_string(),
            role: UserRole::Applicant,
        }
    }

    fn staff() -> Self {
        Self {
            id: "65f0c1d2e3a4b5c6d7e8f902".to_string(),
            email: "oas@university.edu".to_string(),
            role: UserRole::OasStaff,
        }
    }
}

#[test]
fn test_jwt_utils_creation() {
    let jwt_utils = create_test_jwt_utils();
    assert!(!jwt_utils.jwt_config.jwt_secret.is_empty());
    assert!(jwt_utils.jwt_config.access_token_expiration > 0);
    assert!(jwt_utils.jwt_config.refresh_token_expiration > 0);
}

#[test]
fn test_token_type_as_str() {
    assert_eq!(TokenType::Access.as_str(), "access");
    assert_eq!(TokenType::Refresh.as_str(), "refresh");
}

#[test]
fn test_generate_token_pair_success() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::applicant();

    let token_pair = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();
    assert!(!token_pair.access_token.is_empty());
    assert!(!token_pair.refresh_token.is_empty());
    assert_ne!(token_pair.access_token, token_pair.refresh_token);
    assert_eq!(token_pair.expires_in, jwt_utils.jwt_config.access_token_expiration * 60);
    assert_eq!(token_pair.token_type, "Bearer");

    let access = jwt_utils.validate_access_token(&token_pair.access_token).unwrap();
    assert_eq!(access.sub, user.id);
    assert_eq!(access.email, user.email);
    assert_eq!(access.role, UserRole::Applicant);
    assert_eq!(access.token_type, "access");

    let refresh = jwt_utils.validate_refresh_token(&token_pair.refresh_token).unwrap();
    assert_eq!(refresh.token_type, "refresh");
    assert!(refresh.exp > access.exp);
}

#[test]
fn test_role_survives_round_trip() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::staff();
    let pair = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();
    let claims = jwt_utils.validate_access_token(&pair.access_token).unwrap();
    assert_eq!(claims.role, UserRole::OasStaff);
}

#[test]
fn test_each_token_has_unique_jti() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::applicant();
    let first = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();
    let second = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();

    let a = jwt_utils.validate_access_token(&first.access_token).unwrap();
    let b = jwt_utils.validate_access_token(&second.access_token).unwrap();
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_validate_access_token_wrong_type() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::applicant();
    let pair = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();

    match jwt_utils.validate_access_token(&pair.refresh_token).unwrap_err() {
        JwtError::InvalidTokenType { expected, actual } => {
            assert_eq!(expected, "access");
            assert_eq!(actual, "refresh");
        }
        other => panic!("Expected InvalidTokenType error, got {other:?}"),
    }
}

#[test]
fn test_validate_refresh_token_wrong_type() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::applicant();
    let pair = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();

    match jwt_utils.validate_refresh_token(&pair.access_token).unwrap_err() {
        JwtError::InvalidTokenType { expected, actual } => {
            assert_eq!(expected, "refresh");
            assert_eq!(actual, "access");
        }
        other => panic!("Expected InvalidTokenType error, got {other:?}"),
    }
}

#[test]
fn test_validate_token_with_invalid_secret() {
    let jwt_utils_1 = JwtTokenUtilsImpl::new(config_with_secret("secret1_that_is_long_enough_for_security_requirements"));
    let jwt_utils_2 = JwtTokenUtilsImpl::new(config_with_secret("secret2_that_is_long_enough_for_security_requirements"));
    let user = TestUser::applicant();

    let pair = jwt_utils_1.generate_token_pair(&user.id, &user.email, user.role).unwrap();
    assert!(matches!(
        jwt_utils_2.validate_access_token(&pair.access_token),
        Err(JwtError::DecodingFailed(_))
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let mut config = JwtConfig::default();
    // Well past the decoder's default leeway
    config.access_token_expiration = -5;
    let jwt_utils = JwtTokenUtilsImpl::new(config);
    let user = TestUser::applicant();

    let pair = jwt_utils.generate_token_pair(&user.id, &user.email, user.role).unwrap();
    assert!(matches!(
        jwt_utils.validate_access_token(&pair.access_token),
        Err(JwtError::TokenExpired)
    ));
}

#[test]
fn test_validate_malformed_token() {
    let jwt_utils = create_test_jwt_utils();
    for token in ["invalid.token.format", "", "abc"] {
        assert!(matches!(
            jwt_utils.validate_access_token(token),
            Err(JwtError::DecodingFailed(_))
        ));
    }
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();
    assert_eq!(jwt_utils.extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    assert!(matches!(jwt_utils.extract_token_from_header("Basic abc"), Err(JwtError::InvalidToken)));
    assert!(matches!(jwt_utils.extract_token_from_header("Bearer   "), Err(JwtError::InvalidToken)));
    assert!(matches!(jwt_utils.extract_token_from_header(""), Err(JwtError::InvalidToken)));
}
