use crate::core::model::BuscoTableRow;
use anyhow::Result;
use std::fmt::Write as FmtWrite;

/// Page size in points (10 x 6 inches).
pub const PAGE_W: f64 = 720.0;
pub const PAGE_H: f64 = 432.0;

/// Rows that fit on a key/value page below the title.
pub const MAX_TABLE_ROWS: usize = 13;

const BAR_FILL: &str = "#1f77b4";
const COMPLETENESS_COLORS: [&str; 4] = ["#49a34b", "#636633", "#664f33", "#4b5669"];
const COMPLETENESS_LABELS: [&str; 4] = [
    "Complete - single",
    "Complete - multi",
    "Fragmented",
    "Missing",
];

#[derive(Clone, Debug)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
    pub rotate_labels: bool,
}

#[derive(Clone, Debug)]
pub struct TablePage {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub note: Option<String>,
}

#[derive(Clone, Debug)]
pub enum Page {
    Bars(BarChart),
    Table(TablePage),
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Bars(c) => &c.title,
            Page::Table(t) => &t.title,
        }
    }

    pub fn to_svg(&self) -> Result<String> {
        match self {
            Page::Bars(c) => bar_chart_svg(c),
            Page::Table(t) => table_page_svg(t),
        }
    }
}

pub fn bar_chart_svg(chart: &BarChart) -> Result<String> {
    let mut out = String::with_capacity(16 * 1024);
    svg_open(&mut out, PAGE_W, PAGE_H)?;

    let left = 70.0;
    let right = 20.0;
    let top = 40.0;
    let bottom = if chart.rotate_labels { 100.0 } else { 50.0 };
    let plot_w = PAGE_W - left - right;
    let plot_h = PAGE_H - top - bottom;

    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"16\" font-weight=\"bold\" fill=\"#222\" text-anchor=\"middle\">{}</text>",
        PAGE_W / 2.0,
        24.0,
        escape_xml(&chart.title)
    )?;
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" stroke=\"#ddd\"/>",
        left, top, plot_w, plot_h
    )?;

    let max_v = chart
        .bars
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    let axis = value_axis(max_v);
    let y_max = axis.top();
    draw_y_grid(&mut out, left, top, plot_w, plot_h, axis.step, axis.ticks, y_max)?;

    let slot = if chart.bars.is_empty() {
        plot_w
    } else {
        plot_w / chart.bars.len() as f64
    };
    let bar_w = slot * 0.8;
    for (i, (label, value)) in chart.bars.iter().enumerate() {
        let cx = left + slot * (i as f64 + 0.5);
        let v = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let h = (v / y_max).min(1.0) * plot_h;
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            cx - bar_w / 2.0,
            top + plot_h - h,
            bar_w,
            h,
            BAR_FILL
        )?;
        let ly = top + plot_h + 14.0;
        if chart.rotate_labels {
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#444\" text-anchor=\"end\" transform=\"rotate(-45 {} {})\">{}</text>",
                cx,
                ly,
                cx,
                ly,
                escape_xml(label)
            )?;
        } else {
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
                cx,
                ly,
                escape_xml(label)
            )?;
        }
    }

    draw_axis_labels(
        &mut out,
        left,
        top,
        plot_w,
        plot_h,
        PAGE_H - 8.0,
        &chart.x_label,
        &chart.y_label,
    )?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

pub fn table_page_svg(page: &TablePage) -> Result<String> {
    let mut out = String::with_capacity(4 * 1024);
    svg_open(&mut out, PAGE_W, PAGE_H)?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"16\" font-weight=\"bold\" fill=\"#222\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
        PAGE_W / 2.0,
        PAGE_H * 0.05,
        escape_xml(&page.title)
    )?;

    let mut y = 0.13;
    for (key, value) in page.rows.iter().take(MAX_TABLE_ROWS) {
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#222\" dominant-baseline=\"hanging\">{}</text>",
            PAGE_W * 0.1,
            PAGE_H * y,
            escape_xml(key)
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#222\" dominant-baseline=\"hanging\">{}</text>",
            PAGE_W * 0.6,
            PAGE_H * y,
            escape_xml(value)
        )?;
        y += 0.06;
    }

    if let Some(note) = &page.note {
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" font-style=\"italic\" fill=\"#555\" text-anchor=\"middle\">{}</text>",
            PAGE_W / 2.0,
            PAGE_H * 0.92,
            escape_xml(note)
        )?;
    }
    writeln!(out, "</svg>")?;
    Ok(out)
}

/// Horizontal stacked bars, one per table row, on a 0-100 axis.
pub fn completeness_svg(
    title: &str,
    species: &[String],
    rows: &[&BuscoTableRow],
) -> Result<String> {
    let w = 1440.0;
    let left = 260.0;
    let right = 40.0;
    let top = 120.0;
    let bottom = 80.0;
    let h = top + bottom + 72.0 * (rows.len() as f64 + 1.0);
    let plot_w = w - left - right;
    let plot_h = h - top - bottom;
    let x_of = |pct: f64| left + pct.clamp(0.0, 100.0) / 100.0 * plot_w;

    let mut out = String::with_capacity(16 * 1024);
    svg_open(&mut out, w, h)?;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"30\" font-weight=\"bold\" fill=\"#222\" text-anchor=\"middle\">{}</text>",
        w / 2.0,
        44.0,
        escape_xml(title)
    )?;

    let mut lx = left;
    for (color, label) in COMPLETENESS_COLORS.iter().zip(COMPLETENESS_LABELS) {
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"22\" height=\"22\" fill=\"{}\" fill-opacity=\"0.75\"/>",
            lx, 70.0, color
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"20\" fill=\"#222\" dominant-baseline=\"middle\">{}</text>",
            lx + 30.0,
            81.0,
            label
        )?;
        lx += 260.0;
    }

    for tick in (0..=100).step_by(5) {
        let x = x_of(tick as f64);
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#e5e5e5\"/>",
            x,
            top,
            x,
            top + plot_h
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"18\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
            x,
            top + plot_h + 24.0,
            tick
        )?;
    }

    let row_h = plot_h / rows.len().max(1) as f64;
    let bar_h = row_h * 0.8;
    for (i, (row, name)) in rows.iter().zip(species).enumerate() {
        let y = top + row_h * i as f64 + (row_h - bar_h) / 2.0;
        let mut acc = 0.0;
        for (value, color) in row.segments().into_iter().zip(COMPLETENESS_COLORS) {
            let v = if value.is_finite() { value.max(0.0) } else { 0.0 };
            let x0 = x_of(acc);
            acc += v;
            let x1 = x_of(acc);
            if x1 > x0 {
                writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                    x0,
                    y,
                    x1 - x0,
                    bar_h,
                    color
                )?;
            }
        }
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"20\" fill=\"#222\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            left - 10.0,
            y + bar_h / 2.0,
            escape_xml(name)
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"20\" fill=\"#fff\" dominant-baseline=\"middle\">{}</text>",
            x_of(0.9),
            y + bar_h / 2.0,
            escape_xml(&row.one_line_summary)
        )?;
    }

    draw_axis_labels(
        &mut out,
        left,
        top,
        plot_w,
        plot_h,
        h - 16.0,
        "Percentage",
        "Organism",
    )?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn svg_open(out: &mut String, w: f64, h: f64) -> Result<()> {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"Arial, Helvetica, sans-serif\">",
        w, h, w, h
    )?;
    writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>",
        w, h
    )?;
    Ok(())
}

fn draw_y_grid(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    step: f64,
    count: usize,
    y_max: f64,
) -> Result<()> {
    for i in 0..count {
        let v = step * i as f64;
        let y = top + plot_h - v / y_max * plot_h;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-opacity=\"0.6\"/>",
            left,
            y,
            left + plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            left - 4.0,
            y,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_axis_labels(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    x_label_y: f64,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
        left + plot_w / 2.0,
        x_label_y,
        escape_xml(x_label)
    )?;
    let yx = 16.0;
    let yy = top + plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#444\" text-anchor=\"middle\" transform=\"rotate(-90 {} {})\">{}</text>",
        yx,
        yy,
        yx,
        yy,
        escape_xml(y_label)
    )?;
    Ok(())
}

/// Axis tick text: integers bare, large magnitudes in exponent form.
fn fmt_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e7 {
        format!("{v:.1e}")
    } else if v.fract().abs() < 1e-3 {
        format!("{v:.0}")
    } else if a < 10.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.1}")
    }
}

const AXIS_INTERVALS: f64 = 5.0;

/// A zero-based value axis: `ticks` gridlines `step` apart.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ValueAxis {
    step: f64,
    ticks: usize,
}

impl ValueAxis {
    fn top(&self) -> f64 {
        self.step * (self.ticks - 1) as f64
    }
}

/// Picks a 1-2-5 step so about five intervals cover `0..=max`. Values whose
/// rounded top would overflow get evenly split intervals ending at `max`.
fn value_axis(max: f64) -> ValueAxis {
    let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
    let rough = max / AXIS_INTERVALS;
    let mag = 10f64.powi(rough.log10().floor() as i32);
    let step = match rough / mag {
        n if n <= 1.0 => mag,
        n if n <= 2.0 => 2.0 * mag,
        n if n <= 5.0 => 5.0 * mag,
        _ => 10.0 * mag,
    };
    let intervals = (max / step).ceil();
    if step.is_finite() && step > 0.0 && (step * intervals).is_finite() && intervals <= 10.0 {
        ValueAxis {
            step,
            ticks: intervals as usize + 1,
        }
    } else {
        ValueAxis {
            step: max / AXIS_INTERVALS,
            ticks: AXIS_INTERVALS as usize + 1,
        }
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
