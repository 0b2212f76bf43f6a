//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{LimitResult, Termination};

/// One-line summary, `Limit: r < 4.75 +/- 0.25 @ 95% CL`.
pub fn format_limit_line(result: &LimitResult) -> String {
    format!(
        "Limit: r < {} +/- {} @ {}% CL",
        result.limit,
        result.uncertainty,
        result.confidence_level * 100.0
    )
}

/// Format a LimitResult for human-readable terminal output.
///
/// Uses ANSI colors and Unicode box drawing.
pub fn format_limit(result: &LimitResult) -> String {
    let mut frame = Frame::new();
    frame.line(&"-- Hybrid CLs upper limit --".bold().to_string());
    frame.rule('\u{251C}', '\u{2524}');
    frame.line(&format_limit_line(result).green().bold().to_string());

    if let Some((low, high)) = result.interval {
        frame.line(&format!("Interval: [{}, {}]", low, high));
    }

    let how = match result.termination {
        Termination::DirectHit => format!("{} reached accuracy", result.statistic).green(),
        Termination::BracketConverged => "bracket converged".yellow(),
    };
    frame.line(&format!("Stopped: {}", how));
    frame.line(&format!(
        "Bracket: [{}, {}]",
        result.bracket.r_min, result.bracket.r_max
    ));
    frame.line(
        &format!("Toys: {} in {} batches", result.toys, result.batches)
            .dimmed()
            .to_string(),
    );
    frame.finish()
}

/// Inner width of the report frame, in terminal columns.
const FRAME_WIDTH: usize = 60;

/// Report text framed by Unicode box-drawing characters.
struct Frame {
    text: String,
}

impl Frame {
    fn new() -> Self {
        let mut frame = Self {
            text: String::new(),
        };
        frame.rule('\u{250C}', '\u{2510}');
        frame
    }

    fn rule(&mut self, left: char, right: char) {
        self.text.push(left);
        self.text.extend(std::iter::repeat('\u{2500}').take(FRAME_WIDTH));
        self.text.push(right);
        self.text.push('\n');
    }

    /// Left-aligned content, padded by its visible width so colored
    /// content keeps the right border aligned.
    fn line(&mut self, content: &str) {
        let pad = (FRAME_WIDTH - 2).saturating_sub(visible_width(content));
        self.text.push_str("\u{2502} ");
        self.text.push_str(content);
        self.text.extend(std::iter::repeat(' ').take(pad));
        self.text.push_str(" \u{2502}\n");
    }

    fn finish(mut self) -> String {
        self.rule('\u{2514}', '\u{2518}');
        self.text
    }
}

/// Number of printed characters, not counting `ESC [ ... m` color codes.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (false, _) => width += 1,
            (true, 'm') => in_escape = false,
            (true, _) => {}
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfidenceEstimate, ExclusionStatistic, SearchState};

    fn make_result(interval: Option<(f64, f64)>) -> LimitResult {
        LimitResult {
            limit: 4.75,
            uncertainty: 0.25,
            interval,
            confidence_level: 0.95,
            statistic: ExclusionStatistic::Cls,
            termination: Termination::DirectHit,
            bracket: SearchState {
                r_min: 4.5,
                r_max: 5.0,
                cls_min: ConfidenceEstimate::new(0.1, 0.0),
                cls_max: ConfidenceEstimate::new(0.0, 0.0),
            },
            batches: 9,
            toys: 4500,
        }
    }

    #[test]
    fn test_limit_line() {
        assert_eq!(
            format_limit_line(&make_result(None)),
            "Limit: r < 4.75 +/- 0.25 @ 95% CL"
        );
    }

    #[test]
    fn test_format_limit_box() {
        colored::control::set_override(false);
        let output = format_limit(&make_result(Some((4.6875, 4.8125))));
        assert!(output.contains("Limit: r < 4.75 +/- 0.25 @ 95% CL"));
        assert!(output.contains("Interval: [4.6875, 4.8125]"));
        assert!(output.contains("CLs reached accuracy"));
        assert!(output.contains("Toys: 4500 in 9 batches"));
    }

    #[test]
    fn test_frame_lines_have_equal_width() {
        let output = format_limit(&make_result(None));
        let widths: Vec<usize> = output.lines().map(visible_width).collect();
        assert!(widths.iter().all(|&w| w == FRAME_WIDTH + 2), "{:?}", widths);
    }

    #[test]
    fn test_visible_width_skips_color_codes() {
        assert_eq!(visible_width("\x1b[1;32mgreen\x1b[0m"), 5);
        assert_eq!(visible_width("r < 4.75"), 8);
    }
}
