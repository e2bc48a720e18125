use super::*;

// =============================================================================
// Rating
// =============================================================================

#[test]
fn rating_accepts_one_through_five() {
    for stars in 1..=5 {
        assert_eq!(Rating::new(stars).unwrap().get(), stars);
    }
}

#[test]
fn rating_rejects_out_of_range() {
    assert_eq!(Rating::new(0), Err(RatingError(0)));
    assert_eq!(Rating::new(6), Err(RatingError(6)));
}

#[test]
fn rating_error_message() {
    assert_eq!(RatingError(9).to_string(), "rating must be between 1 and 5, got 9");
}

#[test]
fn rating_decode_rejects_out_of_range() {
    assert!(serde_json::from_str::<Rating>("7").is_err());
    assert_eq!(serde_json::from_str::<Rating>("4").unwrap(), Rating::new(4).unwrap());
}

// =============================================================================
// Wire shapes
// =============================================================================

#[test]
fn review_decodes_backend_dto() {
    let json = serde_json::json!({
        "id": "r1",
        "spaceId": "s1",
        "authorName": "Ada",
        "authorEmail": null,
        "rating": 5,
        "text": "Great product",
        "liked": true,
        "createdAt": "2024-05-01T10:00:00.123Z"
    });
    let review: Review = serde_json::from_value(json).unwrap();
    assert_eq!(review.id, "r1");
    assert_eq!(review.space_id.as_deref(), Some("s1"));
    assert_eq!(review.author_email, None);
    assert_eq!(review.rating.get(), 5);
    assert!(review.liked);
    assert!(review.created_at.is_some());
    assert_eq!(review.updated_at, None);
}

#[test]
fn space_decodes_without_timestamps() {
    let json = serde_json::json!({
        "id": "s1",
        "name": "Acme",
        "redirectUrl": "https://acme.example/thanks",
        "slug": "acme",
        "publicUrl": "/t/acme",
        "userId": "u1"
    });
    let space: Space = serde_json::from_value(json).unwrap();
    assert_eq!(space.redirect_url, "https://acme.example/thanks");
    assert_eq!(space.public_url.as_deref(), Some("/t/acme"));
    assert_eq!(space.created_at, None);
}

#[test]
fn new_review_omits_missing_email() {
    let body = NewReview {
        author_name: "Bo".to_owned(),
        author_email: None,
        rating: Rating::new(3).unwrap(),
        text: "ok".to_owned(),
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value, serde_json::json!({ "authorName": "Bo", "rating": 3, "text": "ok" }));
}

#[test]
fn space_request_uses_camel_case() {
    let value = serde_json::to_value(SpaceRequest::new("Acme", "https://acme.example")).unwrap();
    assert_eq!(value, serde_json::json!({ "name": "Acme", "redirectUrl": "https://acme.example" }));
}

#[test]
fn login_response_token_ignores_empty() {
    let resp: LoginResponse = serde_json::from_str(r#"{"accessToken":"","tokenType":"Bearer"}"#).unwrap();
    assert_eq!(resp.token(), None);
    let resp: LoginResponse = serde_json::from_str(r#"{"accessToken":"jwt"}"#).unwrap();
    assert_eq!(resp.token(), Some("jwt"));
    assert_eq!(resp.token_type, None);
}
