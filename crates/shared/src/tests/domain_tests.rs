use super::*;

fn columns(names: &[&str], scores: &[i64], users: &[&str]) -> RatingColumns {
    RatingColumns {
        name: names.iter().map(|n| n.to_string()).collect(),
        beer: scores.to_vec(),
        wine: scores.iter().map(|s| s + 1).collect(),
        whiskey: scores.iter().map(|s| s + 2).collect(),
        username: users.iter().map(|u| u.to_string()).collect(),
    }
}

#[test]
fn batch_rejects_columns_of_different_lengths() {
    let mut raw = columns(&["Ale", "Stout"], &[4, 5], &["tom", "ann"]);
    raw.wine.pop();
    let err = Batch::new(raw).expect_err("ragged batch");
    assert_eq!(err.0.wine, 1);
    assert_eq!(err.0.name, 2);
}

#[test]
fn append_extends_every_column_and_keeps_prefix() {
    let mut table = RatingTable::new();
    table.append(Batch::new(columns(&["Ale"], &[4], &["tom"])).expect("batch"));
    let before = table.clone();

    table.append(Batch::new(columns(&["A", "B"], &[1, 2], &["x", "y"])).expect("batch"));

    assert_eq!(table.len(), 3);
    assert!(table.columns().lengths().is_uniform());
    assert_eq!(&table.columns().name[..1], &before.columns().name[..]);
    assert_eq!(&table.columns().beer[..1], &before.columns().beer[..]);
    assert_eq!(table.columns().name, vec!["Ale", "A", "B"]);
    assert_eq!(table.columns().username, vec!["tom", "x", "y"]);
}

#[test]
fn rows_are_index_aligned() {
    let mut table = RatingTable::new();
    table.append(Batch::new(columns(&["A", "B"], &[1, 2], &["x", "y"])).expect("batch"));

    let rows: Vec<_> = table.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].index, 1);
    assert_eq!(rows[1].name, "B");
    assert_eq!(rows[1].score(Drink::Beer), 2);
    assert_eq!(rows[1].score(Drink::Wine), 3);
    assert_eq!(rows[1].score(Drink::Whiskey), 4);
    assert_eq!(rows[1].username, "y");
}

#[test]
fn deserialize_rejects_ragged_snapshot() {
    let raw = r#"{"name":["A","B"],"beer":[1],"wine":[1,2],"whiskey":[1,2],"username":["x","y"]}"#;
    let err = serde_json::from_str::<RatingTable>(raw).expect_err("ragged snapshot");
    assert!(err.to_string().contains("beer=1"));
}

#[test]
fn serializes_as_five_keyed_columns() {
    let mut table = RatingTable::new();
    table.append(Batch::new(columns(&["Ale"], &[4], &["tom"])).expect("batch"));

    let value = serde_json::to_value(&table).expect("json");
    assert_eq!(
        value,
        serde_json::json!({
            "name": ["Ale"],
            "beer": [4],
            "wine": [5],
            "whiskey": [6],
            "username": ["tom"],
        })
    );
}

#[test]
fn column_lengths_display_names_every_field() {
    let lengths = ColumnLengths {
        name: 2,
        beer: 3,
        wine: 2,
        whiskey: 2,
        username: 2,
    };
    assert!(!lengths.is_uniform());
    assert_eq!(
        lengths.to_string(),
        "name=2, beer=3, wine=2, whiskey=2, username=2"
    );
}
