use super::*;
use shared::domain::{Batch, RatingColumns};

fn table(names: &[&str], users: &[&str]) -> RatingTable {
    let scores: Vec<i64> = (1..=names.len() as i64).collect();
    let mut table = RatingTable::new();
    table.append(
        Batch::new(RatingColumns {
            name: names.iter().map(|n| n.to_string()).collect(),
            beer: scores.clone(),
            wine: scores.clone(),
            whiskey: scores,
            username: users.iter().map(|u| u.to_string()).collect(),
        })
        .expect("batch"),
    );
    table
}

#[test]
fn empty_table_shows_placeholder_and_no_chart() {
    let empty = RatingTable::new();
    let html = render_page(&PageView {
        table: &empty,
        notices: &[],
        form: &RatingForm::default(),
    });

    assert!(html.contains(PAGE_TITLE));
    assert!(html.contains(EMPTY_TABLE_MESSAGE));
    assert!(!html.contains("<svg"));
    assert!(!html.contains("Current Ratings Data"));
}

#[test]
fn page_has_all_five_inputs_and_submit_button() {
    let empty = RatingTable::new();
    let html = render_page(&PageView {
        table: &empty,
        notices: &[],
        form: &RatingForm::default(),
    });

    for field in RatingField::ALL {
        assert!(html.contains(&format!("name=\"{}\"", field.key())));
    }
    assert!(html.contains("Drink Name(s) (comma-separated)"));
    assert!(html.contains("Submit Ratings"));
}

#[test]
fn filled_table_renders_rows_and_chart() {
    let ratings = table(&["Ale", "Merlot"], &["tom", "ann"]);
    let html = render_page(&PageView {
        table: &ratings,
        notices: &[Notice::success("saved")],
        form: &RatingForm::default(),
    });

    assert!(html.contains("Current Ratings Data"));
    assert!(html.contains("<td>Ale</td>"));
    assert!(html.contains("<td>ann</td>"));
    assert!(html.contains("Drink Ratings Visualization"));
    assert!(html.contains("Merlot (ann)"));
    assert!(html.contains("notice success"));
    assert!(!html.contains(EMPTY_TABLE_MESSAGE));
}

#[test]
fn table_has_one_row_per_entry() {
    let ratings = table(&["A", "B", "C"], &["x", "y", "z"]);
    let html = render_table(&ratings);
    assert_eq!(html.matches("<tr><td>").count(), 3);
}

#[test]
fn chart_is_svg_with_a_legend_entry_per_drink() {
    let ratings = table(&["A", "B"], &["x", "y"]);
    let chart = render_chart(&ratings);
    assert!(chart.contains("<svg"));
    assert!(!chart.contains(CHART_UNAVAILABLE_MESSAGE));
    for drink in Drink::ALL {
        assert!(chart.contains(drink.label()));
    }
}

fn single_entry(beer: i64, wine: i64, whiskey: i64) -> RatingTable {
    let mut ratings = RatingTable::new();
    ratings.append(
        Batch::new(RatingColumns {
            name: vec!["Edge".into()],
            beer: vec![beer],
            wine: vec![wine],
            whiskey: vec![whiskey],
            username: vec!["u".into()],
        })
        .expect("batch"),
    );
    ratings
}

#[test]
fn chart_handles_zero_and_negative_scores() {
    let svg = render_chart(&single_entry(0, -3, 0));
    assert!(svg.contains("<svg"));
    assert!(!svg.contains(CHART_UNAVAILABLE_MESSAGE));

    let (low, high) = score_range(&single_entry(0, -3, 0));
    assert!(low < -3.0);
    assert!(high >= 1.0);
}

#[test]
fn chart_survives_extreme_ratings() {
    for ratings in [
        single_entry(i64::MAX, i64::MIN, 0),
        single_entry(100_000_000_000_000_000, 3, 5),
        single_entry(i64::MIN, i64::MIN, i64::MIN),
    ] {
        let svg = render_chart(&ratings);
        assert!(svg.contains("<svg"));
        assert!(!svg.contains(CHART_UNAVAILABLE_MESSAGE));
    }

    let (low, high) = score_range(&single_entry(i64::MAX, i64::MIN, 0));
    assert!(low.is_finite() && high.is_finite());
    assert!(low <= i64::MIN as f64);
    assert!(high >= i64::MAX as f64);
}

#[test]
fn positive_ratings_keep_zero_as_the_floor() {
    let (low, high) = score_range(&table(&["A", "B", "C"], &["x", "y", "z"]));
    assert_eq!(low, 0.0);
    assert!(high > 3.0);
}

#[test]
fn chart_labels_drop_markup_characters() {
    assert_eq!(chart_label("<b>Ale</b> & \"Co's\""), "bAle/b  Cos");
}

#[test]
fn user_text_is_escaped_everywhere() {
    let ratings = table(&["<script>alert(1)</script>"], &["a&b"]);
    let form = RatingForm {
        name: "\"><img>".into(),
        ..RatingForm::default()
    };
    let html = render_page(&PageView {
        table: &ratings,
        notices: &[Notice::error("<b>bad</b>")],
        form: &form,
    });

    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img>"));
    assert!(!html.contains("<b>bad</b>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a&amp;b"));
    assert!(html.contains("value=\"&quot;&gt;&lt;img&gt;\""));
}

#[test]
fn escape_html_handles_quotes() {
    assert_eq!(escape_html("it's \"x\""), "it&#39;s &quot;x&quot;");
}
