use super::*;

fn form(name: &str, beer: &str, wine: &str, whiskey: &str, username: &str) -> RatingForm {
    RatingForm {
        name: name.into(),
        beer: beer.into(),
        wine: wine.into(),
        whiskey: whiskey.into(),
        username: username.into(),
    }
}

#[test]
fn single_entry_parses_into_one_row() {
    let batch = validate(&form("Ale", "4", "3", "5", "tom")).expect("valid");
    assert_eq!(batch.len(), 1);
    assert_eq!(
        batch.columns(),
        &RatingColumns {
            name: vec!["Ale".into()],
            beer: vec![4],
            wine: vec![3],
            whiskey: vec![5],
            username: vec!["tom".into()],
        }
    );
}

#[test]
fn trims_whitespace_and_drops_empty_tokens() {
    let batch = validate(&form(" A , ,B,", "1, 2", " 3 ,4 ", "5,,6", "x , y")).expect("valid");
    assert_eq!(batch.columns().name, vec!["A", "B"]);
    assert_eq!(batch.columns().beer, vec![1, 2]);
    assert_eq!(batch.columns().wine, vec![3, 4]);
    assert_eq!(batch.columns().whiskey, vec![5, 6]);
    assert_eq!(batch.columns().username, vec!["x", "y"]);
}

#[test]
fn non_integer_rating_is_a_parse_error() {
    let err = validate(&form("A,B,C", "3, bad, 5", "1,2,3", "1,2,3", "x,y,z")).expect_err("bad");
    assert_eq!(
        err,
        ValidationError::Parse {
            field: RatingField::Beer,
            token: "bad".into(),
        }
    );
    assert!(err.user_message().starts_with(PARSE_MESSAGE));
}

#[test]
fn decimal_rating_is_rejected() {
    let err = validate(&form("A", "1", "2.5", "3", "x")).expect_err("decimal");
    assert!(matches!(
        err,
        ValidationError::Parse {
            field: RatingField::Wine,
            ..
        }
    ));
}

#[test]
fn negative_ratings_follow_integer_parsing() {
    let batch = validate(&form("A", "-1", "+2", "0", "x")).expect("signed integers");
    assert_eq!(batch.columns().beer, vec![-1]);
    assert_eq!(batch.columns().wine, vec![2]);
}

#[test]
fn length_mismatch_is_a_shape_error() {
    let err = validate(&form("A,B", "1,2,3", "1,2", "1,2", "x,y")).expect_err("mismatch");
    let ValidationError::ShapeMismatch { lengths } = err.clone() else {
        panic!("expected shape mismatch, got {err:?}");
    };
    assert_eq!(lengths.name, 2);
    assert_eq!(lengths.beer, 3);
    assert!(err.user_message().starts_with(SHAPE_MISMATCH_MESSAGE));
}

#[test]
fn parse_error_wins_over_shape_error() {
    let err = validate(&form("A", "1,x", "1", "1", "u")).expect_err("both wrong");
    assert!(matches!(err, ValidationError::Parse { .. }));
}

#[test]
fn missing_username_is_a_shape_error() {
    let err = validate(&form("Ale", "4", "3", "5", "")).expect_err("no user");
    assert!(matches!(err, ValidationError::ShapeMismatch { .. }));
}

#[test]
fn all_empty_fields_give_empty_batch() {
    let batch = validate(&RatingForm::default()).expect("empty is uniform");
    assert!(batch.is_empty());
}

#[test]
fn validation_error_maps_to_validation_api_error() {
    let err = validate(&form("A", "x", "1", "1", "u")).expect_err("bad");
    let api: ApiError = (&err).into();
    assert_eq!(api.code, ErrorCode::Validation);
    assert!(api.message.contains("'x'"));
}
