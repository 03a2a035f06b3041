use ariadne::{Color, Label, Report, ReportKind, Source};
use ngrx_gen_common::{Diagnostic, Span};

/// Print a diagnostic to stderr, with a source excerpt when it has a span.
pub fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) {
    let kind = if diag.is_error() {
        ReportKind::Error
    } else {
        ReportKind::Warning
    };

    let Some(ref span) = diag.span else {
        let prefix = if diag.is_error() { "error" } else { "warning" };
        eprintln!("{}: {}", prefix, diag.message);
        if let Some(ref suggestion) = diag.suggestion {
            eprintln!("   = help: {}", suggestion);
        }
        eprintln!();
        return;
    };

    let color = if diag.is_error() {
        Color::Red
    } else {
        Color::Yellow
    };
    let range = char_range(source, span);

    let mut report = Report::build(kind, file_name, range.start)
        .with_message(&diag.message)
        .with_label(
            Label::new((file_name, range))
                .with_message(&diag.message)
                .with_color(color),
        );

    for related in &diag.related {
        report = report.with_label(
            Label::new((file_name, char_range(source, &related.span)))
                .with_message(&related.message)
                .with_color(Color::Blue),
        );
    }

    if let Some(ref suggestion) = diag.suggestion {
        report = report.with_help(suggestion);
    }

    if let Err(e) = report
        .finish()
        .eprint((file_name, Source::from(source)))
    {
        tracing::warn!(error = %e, "failed to render diagnostic");
        eprintln!("{}", diag);
    }
}

/// Labels are positioned in characters, spans in bytes. Empty spans are
/// widened to one character so the label stays visible.
fn char_range(source: &str, span: &Span) -> std::ops::Range<usize> {
    let to_chars = |offset: usize| {
        source
            .get(..offset.min(source.len()))
            .map_or(0, |prefix| prefix.chars().count())
    };
    let start = to_chars(span.start.offset as usize);
    let end = to_chars(span.end.offset as usize).max(start + 1);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngrx_gen_common::Position;

    fn span(start: u32, end: u32) -> Span {
        let at = |offset| Position {
            line: 1,
            column: offset + 1,
            offset,
        };
        Span::new("a.ts", at(start), at(end))
    }

    #[test]
    fn byte_offsets_become_char_offsets() {
        let source = "// Ünïcode\ntype";
        let type_start = source.find("type").unwrap() as u32;
        let range = char_range(source, &span(type_start, type_start + 4));
        assert_eq!(range, 11..15);
    }

    #[test]
    fn empty_span_is_widened() {
        assert_eq!(char_range("abc", &span(3, 3)), 3..4);
    }
}
