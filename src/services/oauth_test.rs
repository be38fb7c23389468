use super::*;

fn config() -> GoogleConfig {
    GoogleConfig {
        client_id: "client-123".into(),
        client_secret: "shh".into(),
        redirect_uri: "http://localhost:3000/auth/google/callback".into(),
    }
}

fn google_user(sub: &str, email: Option<&str>, name: Option<&str>) -> GoogleUser {
    GoogleUser { sub: sub.into(), email: email.map(Into::into), name: name.map(Into::into), picture: None }
}

#[test]
fn authorize_url_encodes_params() {
    let url = authorize_url(&config(), "csrf-state").unwrap();
    assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(url.contains("client_id=client-123"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
    assert!(url.contains("scope=openid+email+profile"));
    assert!(url.contains("state=csrf-state"));
    assert!(!url.contains("shh"));
}

#[test]
fn nickname_uses_email_local_part_and_sub_tail() {
    let user = google_user("109876543210", Some("jane.doe@gmail.com"), Some("Jane"));
    assert_eq!(nickname_for(&user), "jane.doe-543210");
}

#[test]
fn nickname_falls_back_to_name_then_user() {
    assert_eq!(nickname_for(&google_user("abc", None, Some("Jane"))), "Jane-abc");
    assert_eq!(nickname_for(&google_user("42", None, None)), "user-42");
}

#[test]
fn google_user_ignores_extra_claims() {
    let user: GoogleUser = serde_json::from_value(serde_json::json!({
        "sub": "1",
        "email": "a@b.co",
        "email_verified": true,
        "picture": "https://example.com/p.png"
    }))
    .unwrap();
    assert_eq!(user.picture.as_deref(), Some("https://example.com/p.png"));
    assert!(user.name.is_none());
}
