// ============================================================
// Layer 6 — Attention Rendering
// ============================================================
// Turns an AttentionFigure into files a person can open:
//
//   to_csv  → header row of source words, one row per
//             translation word, weights with 6 decimals
//   to_svg  → grey-scale heatmap (white = 0, black = 1) with
//             source words along the top, translation words
//             down the left
//
// translation_text builds the plain-text sample summary logged
// next to each figure, one <SOS> … <EOS> framed line per sentence.

use std::fmt::Write as _;

use crate::domain::attention::{AttentionFigure, AttentionMatrix};

const CELL:        usize = 28;
const LEFT_MARGIN: usize = 110;
const TOP_MARGIN:  usize = 110;

/// Bundle words and weights into a figure.
pub fn visualize_attention(
    source_words:      Vec<String>,
    translation_words: Vec<String>,
    weights:           AttentionMatrix,
) -> AttentionFigure {
    AttentionFigure { source_words, translation_words, weights }
}

/// Weights as CSV, labelled with the words on both axes.
pub fn to_csv(figure: &AttentionFigure) -> String {
    let mut out = String::from("translation\\source");
    for word in &figure.source_words {
        out.push(',');
        out.push_str(&csv_field(word));
    }
    out.push('\n');

    for (i, row) in figure.weights.rows().iter().enumerate() {
        let label = figure.translation_words.get(i).map(String::as_str).unwrap_or("");
        out.push_str(&csv_field(label));
        for weight in row {
            let _ = write!(out, ",{:.6}", weight);
        }
        out.push('\n');
    }
    out
}

/// Standalone SVG heatmap of the attention weights.
pub fn to_svg(figure: &AttentionFigure) -> String {
    let columns = figure.weights.columns();
    let rows    = figure.weights.num_rows();
    let width   = LEFT_MARGIN + columns * CELL + 10;
    let height  = TOP_MARGIN + rows * CELL + 10;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="monospace" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="{width}" height="{height}" fill="white"/>"#);

    for (j, word) in figure.source_words.iter().enumerate().take(columns) {
        let x = LEFT_MARGIN + j * CELL + CELL / 2;
        let y = TOP_MARGIN - 6;
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" transform="rotate(-60 {x} {y})">{}</text>"#,
            xml_escape(word)
        );
    }

    for (i, row) in figure.weights.rows().iter().enumerate() {
        let y = TOP_MARGIN + i * CELL;
        if let Some(word) = figure.translation_words.get(i) {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                LEFT_MARGIN - 6,
                y + CELL / 2 + 4,
                xml_escape(word)
            );
        }
        for (j, &weight) in row.iter().enumerate() {
            let x     = LEFT_MARGIN + j * CELL;
            let shade = grey_level(weight);
            let _ = writeln!(
                svg,
                r#"<rect x="{x}" y="{y}" width="{cell}" height="{cell}" fill="rgb({shade},{shade},{shade})"><title>{weight:.3}</title></rect>"#,
                cell = CELL,
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Plain-text summary of one sampled translation.
/// Every line is framed by exactly one `<SOS>` and one `<EOS>`,
/// whether or not the word list already carried them.
pub fn translation_text(
    source_words:      &[String],
    target_words:      &[String],
    translation_words: &[String],
    sos_token:         &str,
    eos_token:         &str,
) -> String {
    let frame = |words: &[String]| {
        let mut line = vec![sos_token];
        line.extend(
            words
                .iter()
                .map(String::as_str)
                .filter(|w| *w != sos_token && *w != eos_token),
        );
        line.push(eos_token);
        line.join(" ")
    };
    format!(
        "Source: {}\nTarget: {}\nTranslation: {}",
        frame(source_words),
        frame(target_words),
        frame(translation_words),
    )
}

fn grey_level(weight: f32) -> u8 {
    let w = weight.clamp(0.0, 1.0);
    (255.0 * (1.0 - w)).round() as u8
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attention::WindowBounds;

    fn words(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(String::from).collect()
    }

    fn figure() -> AttentionFigure {
        let mut weights = AttentionMatrix::new(3);
        weights.push_window(WindowBounds { start: 0, end: 1 }, &[0.25, 0.75]);
        weights.push_window(WindowBounds { start: 1, end: 2 }, &[1.0, 0.0]);
        visualize_attention(words("ein haus <EOS>"), words("a <EOS>"), weights)
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&figure());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "translation\\source,ein,haus,<EOS>");
        assert_eq!(lines[1], "a,0.250000,0.750000,0.000000");
        assert_eq!(lines[2], "<EOS>,0.000000,1.000000,0.000000");
    }

    #[test]
    fn test_svg_escapes_markers_and_draws_every_cell() {
        let svg = to_svg(&figure());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("&lt;EOS&gt;"));
        assert!(!svg.contains("<EOS>"));
        // background + 2 rows × 3 columns
        assert_eq!(svg.matches("<rect").count(), 7);
        assert!(svg.contains("fill=\"rgb(0,0,0)\""));
    }

    #[test]
    fn test_translation_text_frames_each_line_once() {
        let text = translation_text(
            &words("ein haus <EOS>"),
            &words("<SOS> a house <EOS>"),
            &words("a a <EOS>"),
            "<SOS>",
            "<EOS>",
        );
        assert_eq!(
            text,
            "Source: <SOS> ein haus <EOS>\n\
             Target: <SOS> a house <EOS>\n\
             Translation: <SOS> a a <EOS>"
        );
    }
}
