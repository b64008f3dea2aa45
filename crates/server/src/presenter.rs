use plotters::prelude::*;
use shared::{
    domain::{Drink, RatingField, RatingTable},
    protocol::{Notice, NoticeLevel, RatingForm},
};
use tracing::warn;

pub const PAGE_TITLE: &str = "Interactive Drink Rating App with GitHub Integration";
pub const EMPTY_TABLE_MESSAGE: &str = "No data available yet. Add some ratings!";

pub const CHART_UNAVAILABLE_MESSAGE: &str = "The ratings chart could not be drawn.";

/// One x-axis slot per drink plus one empty slot between entries.
const SLOTS_PER_ENTRY: usize = Drink::ALL.len() + 1;
const SLOT_WIDTH: usize = 22;
const CHART_HEIGHT: u32 = 380;
const MIN_CHART_WIDTH: usize = 480;
const MAX_CHART_WIDTH: usize = 4000;

pub struct PageView<'a> {
    pub table: &'a RatingTable,
    pub notices: &'a [Notice],
    /// Values placed back into the inputs.
    pub form: &'a RatingForm,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(PAGE_TITLE)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(PAGE_TITLE)));
    html.push_str("<h3>Add your drink ratings below:</h3>\n");
    html.push_str(
        "<p><strong>Note</strong>: You must add a rating for all categories (Beer, Wine, Whiskey).</p>\n",
    );

    for notice in view.notices {
        html.push_str(&render_notice(notice));
    }

    html.push_str(&render_form(view.form));

    if view.table.is_empty() {
        html.push_str(&render_notice(&Notice::info(EMPTY_TABLE_MESSAGE)));
    } else {
        html.push_str("<h3>Current Ratings Data</h3>\n");
        html.push_str(&render_table(view.table));
        html.push_str("<h3>Drink Ratings Visualization</h3>\n");
        html.push_str(&render_chart(view.table));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!(
        "<div class=\"notice {class}\" role=\"status\">{}</div>\n",
        escape_html(&notice.message)
    )
}

fn field_label(field: RatingField) -> &'static str {
    match field {
        RatingField::Name => "Drink Name(s) (comma-separated)",
        RatingField::Beer => "Beer Ratings (comma-separated)",
        RatingField::Wine => "Wine Ratings (comma-separated)",
        RatingField::Whiskey => "Whiskey Ratings (comma-separated)",
        RatingField::Username => "User Names (comma-separated)",
    }
}

fn render_form(form: &RatingForm) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/\" id=\"drink_form\">\n");
    for field in RatingField::ALL {
        let key = field.key();
        html.push_str(&format!(
            "<label for=\"{key}\">{}</label>\n<input type=\"text\" id=\"{key}\" name=\"{key}\" value=\"{}\">\n",
            field_label(field),
            escape_html(form.field(field)),
        ));
    }
    html.push_str("<button type=\"submit\">Submit Ratings</button>\n</form>\n");
    html
}

pub fn render_table(table: &RatingTable) -> String {
    let mut html = String::from("<table class=\"ratings\">\n<thead><tr><th></th>");
    for field in RatingField::ALL {
        html.push_str(&format!("<th>{}</th>", field.key()));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in table.rows() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.index,
            escape_html(row.name),
            row.beer,
            row.wine,
            row.whiskey,
            escape_html(row.username),
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn drink_color(drink: Drink) -> RGBColor {
    match drink {
        Drink::Beer => RGBColor(0xe0, 0xa5, 0x26),
        Drink::Wine => RGBColor(0x8e, 0x1f, 0x3f),
        Drink::Whiskey => RGBColor(0x9c, 0x5a, 0x1c),
    }
}

/// Grouped bar chart as inline SVG: one group per entry, one bar per drink.
pub fn render_chart(table: &RatingTable) -> String {
    match draw_chart(table) {
        Ok(svg) => format!("<div class=\"chart\">\n{svg}\n</div>\n"),
        Err(error) => {
            warn!(%error, rows = table.len(), "failed to draw ratings chart");
            render_notice(&Notice::warning(CHART_UNAVAILABLE_MESSAGE))
        }
    }
}

fn draw_chart(table: &RatingTable) -> anyhow::Result<String> {
    let slots = table.len() * SLOTS_PER_ENTRY;
    let labels: Vec<String> = table
        .rows()
        .map(|row| chart_label(&format!("{} ({})", row.name, row.username)))
        .collect();
    let (low, high) = score_range(table);
    let width = slots
        .saturating_mul(SLOT_WIDTH)
        .saturating_add(160)
        .clamp(MIN_CHART_WIDTH, MAX_CHART_WIDTH) as u32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(90)
            .y_label_area_size(80)
            .build_cartesian_2d((0..slots).into_segmented(), low..high)?;

        let x_label = |slot: &SegmentValue<usize>| match slot {
            SegmentValue::CenterOf(slot) if slot % SLOTS_PER_ENTRY == 1 => labels
                .get(slot / SLOTS_PER_ENTRY)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots + 1)
            .x_label_formatter(&x_label)
            .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
            .y_desc("Rating")
            .draw()?;

        for (offset, drink) in Drink::ALL.into_iter().enumerate() {
            let color = drink_color(drink);
            chart
                .draw_series(table.rows().map(|row| {
                    let slot = row.index * SLOTS_PER_ENTRY + offset;
                    Rectangle::new(
                        [
                            (SegmentValue::Exact(slot), 0.0),
                            (SegmentValue::Exact(slot + 1), row.score(drink) as f64),
                        ],
                        color.filled(),
                    )
                }))?
                .label(drink.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}

/// Value range for the y axis. Always includes zero and stays in `f64`, so
/// extreme ratings cannot overflow.
fn score_range(table: &RatingTable) -> (f64, f64) {
    let scores = || {
        table
            .rows()
            .flat_map(|row| Drink::ALL.map(|drink| row.score(drink) as f64))
    };
    let low = scores().fold(0.0, f64::min);
    let high = scores().fold(1.0, f64::max);
    let pad = (high - low) * 0.05;
    (if low < 0.0 { low - pad } else { 0.0 }, high + pad)
}

/// Axis labels are written into the SVG as text; markup characters are dropped.
fn chart_label(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '<' | '>' | '&' | '"' | '\''))
        .collect()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const STYLE: &str = "<style>
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
form label { display: block; margin-top: .6rem; }
form input { width: 100%; padding: .3rem; }
form button { margin-top: 1rem; }
.notice { padding: .6rem .8rem; margin: .6rem 0; border-radius: 4px; }
.notice.success { background: #e3f6e5; }
.notice.info { background: #e6f0fb; }
.notice.warning { background: #fff4d6; }
.notice.error { background: #fbe3e3; }
table.ratings { border-collapse: collapse; margin: 1rem 0; }
table.ratings th, table.ratings td { border: 1px solid #ccc; padding: .25rem .6rem; }
</style>
";

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
