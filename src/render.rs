//! Plain-text dashboard: metric tiles, beta reading and three line charts.
//!
//! Charts are drawn with ratatui's [`Chart`] widget into an off-screen
//! [`Buffer`], which is then flattened to text so the dashboard can be
//! printed or written anywhere.

use std::fmt::Write;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

use crate::models::Analysis;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Default chart width in characters.
pub const DEFAULT_WIDTH: usize = 60;

/// Narrower requests are widened so axis labels and titles still fit.
pub const MIN_WIDTH: usize = 40;

const MAX_WIDTH: usize = 400;

/// Rows per chart, borders included.
pub const CHART_HEIGHT: u16 = 14;

/// Format a fraction as a percentage with two decimals (`0.1234` → `12.34%`).
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// One plotted line.
struct Trace<'a> {
    name: &'a str,
    values: &'a [f64],
    color: Color,
}

/// Render the full dashboard for one analysis.
pub fn render_dashboard(analysis: &Analysis, width: usize) -> String {
    let mut out = String::new();
    let m = &analysis.metrics;

    let _ = writeln!(out, "Stock Risk & Return Analyzer");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Analysis for: {}", analysis.company_name);
    let _ = writeln!(
        out,
        "Resolved Ticker: {} (data: {}, benchmark: {}, period: {})",
        analysis.ticker, analysis.symbol, analysis.market_index, analysis.period
    );
    let _ = writeln!(out);

    let tiles = [
        ("CAGR", percent(m.cagr)),
        ("Volatility", percent(m.volatility)),
        ("Max Drawdown", percent(m.max_drawdown)),
        ("Beta", format!("{:.2}", m.beta)),
    ];
    let header: Vec<String> = tiles.iter().map(|(k, _)| format!("{:<14}", k)).collect();
    let values: Vec<String> = tiles.iter().map(|(_, v)| format!("{:<14}", v)).collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());
    let _ = writeln!(out, "{}", values.join(" ").trim_end());
    let _ = writeln!(out);
    let _ = writeln!(out, "Beta Interpretation: {}", analysis.beta_class);
    let _ = writeln!(out);

    let closes = analysis.prices.closes();
    let dates: Vec<String> = analysis
        .prices
        .points()
        .iter()
        .map(|p| p.date.to_string())
        .collect();
    out.push_str(&draw_chart(
        "Stock Price",
        &[Trace {
            name: "Close",
            values: &closes,
            color: Color::Cyan,
        }],
        &dates,
        |v| format!("{:.2}", v),
        width,
    ));

    let cumulative = analysis.cumulative_returns.values();
    let dates: Vec<String> = analysis
        .cumulative_returns
        .points()
        .iter()
        .map(|p| p.date.to_string())
        .collect();
    out.push_str(&draw_chart(
        "Cumulative Returns",
        &[Trace {
            name: "Cumulative",
            values: &cumulative,
            color: Color::Green,
        }],
        &dates,
        percent,
        width,
    ));

    let stock: Vec<f64> = analysis.aligned_returns.iter().map(|r| r.stock).collect();
    let market: Vec<f64> = analysis.aligned_returns.iter().map(|r| r.market).collect();
    let dates: Vec<String> = analysis
        .aligned_returns
        .iter()
        .map(|r| r.date.to_string())
        .collect();
    out.push_str(&draw_chart(
        "Stock vs Market Returns (Daily)",
        &[
            Trace {
                name: "Stock",
                values: &stock,
                color: Color::Cyan,
            },
            Trace {
                name: "Market",
                values: &market,
                color: Color::Yellow,
            },
        ],
        &dates,
        percent,
        width,
    ));

    out
}

/// Draw `traces` as a bordered line chart and return it as text.
///
/// `dates` labels the x axis at its start, middle and end. Single-trace
/// charts carry no legend; the title names the series.
fn draw_chart(
    title: &str,
    traces: &[Trace<'_>],
    dates: &[String],
    fmt_value: impl Fn(f64) -> String,
    width: usize,
) -> String {
    let points: Vec<Vec<(f64, f64)>> = traces.iter().map(|t| indexed(t.values)).collect();
    let datasets: Vec<Dataset> = traces
        .iter()
        .zip(&points)
        .map(|(trace, data)| {
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(trace.color))
                .data(data);
            if traces.len() > 1 {
                dataset.name(trace.name)
            } else {
                dataset
            }
        })
        .collect();

    let len = traces.iter().map(|t| t.values.len()).max().unwrap_or(0);
    let x_max = (len.saturating_sub(1) as f64).max(1.0);
    let (y_min, y_max) = padded_bounds(traces.iter().flat_map(|t| t.values.iter().copied()));

    let x_labels = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => vec![
            Span::raw(first.clone()),
            Span::raw(dates[dates.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
        _ => vec![Span::raw("(no data)")],
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(fmt_value(y_min)),
                    Span::raw(fmt_value((y_min + y_max) / 2.0)),
                    Span::raw(fmt_value(y_max)),
                ]),
        );

    let width = width.clamp(MIN_WIDTH, MAX_WIDTH) as u16;
    let area = Rect::new(0, 0, width, CHART_HEIGHT);
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_text(&buf)
}

/// `(index, value)` pairs for the finite values.
fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Range of the finite values, widened by 5% on each side. A flat or empty
/// input still gets a non-empty range.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0));

    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad, hi + pad)
}

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .filter_map(|x| buf.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_bounds_ignores_non_finite() {
        let (lo, hi) = padded_bounds([f64::NAN, 2.0, -1.0].into_iter());
        assert!((lo - -1.15).abs() < 1e-12);
        assert!((hi - 2.15).abs() < 1e-12);
    }

    #[test]
    fn padded_bounds_widens_flat_and_empty_input() {
        assert_eq!(padded_bounds([200.0, 200.0].into_iter()), (190.0, 210.0));
        assert_eq!(padded_bounds(std::iter::empty()), (-0.05, 0.05));
    }

    #[test]
    fn indexed_skips_non_finite_but_keeps_positions() {
        assert_eq!(indexed(&[1.0, f64::NAN, 3.0]), vec![(0.0, 1.0), (2.0, 3.0)]);
    }

    #[test]
    fn buffer_text_trims_trailing_blanks() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "ab", Style::default());
        assert_eq!(buffer_text(&buf), "ab\n\n");
    }
}
