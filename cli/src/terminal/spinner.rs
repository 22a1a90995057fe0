//! Progress display for a running walk.
//!
//! The walk runs inside a span shown by `tracing-indicatif`; each stage of the
//! walker replaces the span's message. Nothing here touches walk state.

use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// A span that shows a spinner while entered.
pub fn walk_span() -> Span {
    let span = info_span!("walk", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message("starting");
    span
}

/// Stage callback for the walker: updates whichever walk span is current.
pub fn stage_reporter() -> Box<dyn Fn(&str) + Send + Sync> {
    Box::new(|stage: &str| {
        Span::current().pb_set_message(stage);
    })
}

