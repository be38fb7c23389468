use super::*;

#[test]
fn escape_like_escapes_metacharacters() {
    assert_eq!(escape_like("plain"), "plain");
    assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    assert_eq!(escape_like("a\\b"), "a\\\\b");
}

#[test]
fn nickname_validation() {
    assert_eq!(validate_nickname("  투자왕 ").unwrap(), "투자왕");
    assert!(matches!(validate_nickname("   "), Err(ProfileError::Validation(_))));
    assert!(matches!(validate_nickname("me@home"), Err(ProfileError::Validation(_))));
    assert!(matches!(validate_nickname(&"가".repeat(41)), Err(ProfileError::Validation(_))));
    assert!(validate_nickname(&"가".repeat(40)).is_ok());
}

#[test]
fn profile_update_is_partial() {
    let update: ProfileUpdate = serde_json::from_value(serde_json::json!({ "isPublic": true })).unwrap();
    assert_eq!(update.is_public, Some(true));
    assert!(update.nickname.is_none());
    assert!(update.photo_url.is_none());
}

#[tokio::test]
async fn empty_search_returns_nothing_without_database() {
    let state = crate::state::test_helpers::test_app_state();
    assert!(search_users(&state.pool, "   ", SEARCH_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_nickname_fails_before_database() {
    let state = crate::state::test_helpers::test_app_state();
    let update = ProfileUpdate { nickname: Some(String::new()), ..ProfileUpdate::default() };
    let err = update_profile(&state.pool, Uuid::new_v4(), update).await.unwrap_err();
    assert!(matches!(err, ProfileError::Validation(_)));
}

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::test_db;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn public_users_are_searchable() {
        let pool = test_db::pool().await;
        let user = test_db::create_user(&pool).await;
        let nickname = format!("Searchable{}", &Uuid::new_v4().simple().to_string()[..8]);
        let update = ProfileUpdate { nickname: Some(nickname.clone()), photo_url: None, is_public: Some(true) };
        let profile = update_profile(&pool, user, update).await.unwrap();
        assert!(profile.is_public);

        let hits = search_users(&pool, &nickname.to_lowercase(), SEARCH_LIMIT).await.unwrap();
        assert!(hits.iter().any(|h| h.id == user));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn private_profile_hidden_from_others() {
        let pool = test_db::pool().await;
        let owner = test_db::create_user(&pool).await;
        let other = test_db::create_user(&pool).await;
        assert!(matches!(get_public_profile(&pool, other, owner).await, Err(ProfileError::NotFound)));
        assert!(get_public_profile(&pool, owner, owner).await.unwrap().email.is_some());
    }
}
