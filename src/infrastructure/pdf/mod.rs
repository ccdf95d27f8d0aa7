// ============================================================
// REPORT PDF RENDERER
// ============================================================
// Fixed one-page layout: identity table plus indicator scores

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::domain::error::{AppError, Result};
use crate::domain::submission::{IndicatorScore, SubmissionDetail};

/// Placeholder rendered for any field that is null/absent at query time.
pub const NOT_AVAILABLE: &str = "N/A";

// Letter page, points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: i64 = 72;
const VALUE_COLUMN: i64 = 190;
const SCORE_COLUMN: i64 = 420;
const LINE_HEIGHT: i64 = 20;

/// Map an optional display value to text, substituting the fixed placeholder.
pub fn display_or_na(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn display_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn display_name(detail: &SubmissionDetail) -> String {
    let first = display_or_na(detail.first_name.as_deref());
    match detail.last_name.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(last) => format!("{} {}", first, last),
        None => first,
    }
}

/// Render the one-page report and write it to `output_dir`. The file name
/// embeds the submission ID so files correlate with database records.
pub fn render_report(
    detail: &SubmissionDetail,
    scores: &[IndicatorScore],
    output_dir: &Path,
) -> Result<PathBuf> {
    let filename = format!("stability_report_{}.pdf", detail.submission_id);
    let path = output_dir.join(filename);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_font,
            "F2" => bold_font,
        },
    });

    let content = Content {
        operations: page_operations(detail, scores),
    };
    let encoded = content
        .encode()
        .map_err(|e| AppError::RenderError(format!("Failed to encode page content: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(&path)
        .map_err(|e| AppError::RenderError(format!("Failed to write PDF: {}", e)))?;

    Ok(path)
}

fn page_operations(detail: &SubmissionDetail, scores: &[IndicatorScore]) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - 72;

    text(&mut ops, "F2", 18, MARGIN_LEFT, y, "STABILITY EVALUATION REPORT");
    y -= 12;
    rule(&mut ops, MARGIN_LEFT, y, PAGE_WIDTH - MARGIN_LEFT);
    y -= LINE_HEIGHT + 8;

    let identity_rows = [
        ("Name:", display_name(detail)),
        ("Email:", display_or_na(detail.email.as_deref())),
        (
            "Submission Date:",
            detail.created_at.format("%Y-%m-%d").to_string(),
        ),
        ("Region:", display_or_na(detail.region_name.as_deref())),
        (
            "Age Range:",
            display_or_na(detail.age_range_label.as_deref()),
        ),
    ];
    for (label, value) in identity_rows {
        text(&mut ops, "F2", 10, MARGIN_LEFT, y, label);
        text(&mut ops, "F1", 10, VALUE_COLUMN, y, &value);
        y -= LINE_HEIGHT;
    }

    y -= LINE_HEIGHT;
    text(&mut ops, "F2", 14, MARGIN_LEFT, y, "Indicator Scores");
    y -= LINE_HEIGHT;

    text(&mut ops, "F2", 10, MARGIN_LEFT, y, "Indicator");
    text(&mut ops, "F2", 10, SCORE_COLUMN, y, "Score");
    y -= 6;
    rule(&mut ops, MARGIN_LEFT, y, PAGE_WIDTH - MARGIN_LEFT);
    y -= LINE_HEIGHT - 6;

    for score in scores {
        text(&mut ops, "F1", 10, MARGIN_LEFT, y, &score.indicator_name);
        text(
            &mut ops,
            "F1",
            10,
            SCORE_COLUMN,
            y,
            &score.score_value.to_string(),
        );
        y -= LINE_HEIGHT;
    }

    text(&mut ops, "F1", 10, MARGIN_LEFT, y, "Instability Ratio");
    text(
        &mut ops,
        "F1",
        10,
        SCORE_COLUMN,
        y,
        &display_ratio(detail.instability_ratio),
    );

    ops
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(value)]));
    ops.push(Operation::new("ET", vec![]));
}

fn rule(ops: &mut Vec<Operation>, x1: i64, y: i64, x2: i64) {
    ops.push(Operation::new("m", vec![x1.into(), y.into()]));
    ops.push(Operation::new("l", vec![x2.into(), y.into()]));
    ops.push(Operation::new("S", vec![]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn detail(with_values: bool) -> SubmissionDetail {
        SubmissionDetail {
            submission_id: Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            instability_ratio: with_values.then_some(0.42),
            first_name: with_values.then(|| "Jane".to_string()),
            last_name: with_values.then(|| "Doe".to_string()),
            email: with_values.then(|| "a@b.com".to_string()),
            age_range_label: with_values.then(|| "25-34".to_string()),
            region_name: with_values.then(|| "Gauteng".to_string()),
        }
    }

    #[test]
    fn placeholder_substitution() {
        assert_eq!(display_or_na(Some("Gauteng")), "Gauteng");
        assert_eq!(display_or_na(Some("  ")), NOT_AVAILABLE);
        assert_eq!(display_or_na(None), NOT_AVAILABLE);
        assert_eq!(display_ratio(Some(0.42)), "0.42");
        assert_eq!(display_ratio(Some(0.5)), "0.50");
        assert_eq!(display_ratio(None), NOT_AVAILABLE);
    }

    #[test]
    fn file_name_embeds_submission_id() {
        let dir = tempfile::tempdir().unwrap();
        let scores = vec![IndicatorScore {
            indicator_name: "Economic Management".to_string(),
            score_value: 3,
        }];
        let path = render_report(&detail(true), &scores, dir.path()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "stability_report_3fa85f64-5717-4562-b3fc-2c963f66afa6.pdf"
        );
        assert!(path.exists());
    }

    #[test]
    fn rendered_document_has_one_page_and_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_report(&detail(false), &[], dir.path()).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let extracted = doc.extract_text(&[1]).unwrap_or_default();
        assert!(extracted.contains("STABILITY EVALUATION REPORT"));
        assert!(extracted.contains(NOT_AVAILABLE));
    }
}
