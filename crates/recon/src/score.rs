use crate::config::CompareOptions;
use crate::model::{
    Alignment, ColumnDiff, ComparePlan, Discordance, DiscordanceLabel, JoinedRow, RowScore,
    ScoredRow, CONFIDENCE_COLUMN, VERDICT_COLUMN,
};

/// Score one pair of verdict/confidence answers.
///
/// Returns `None` when either verdict is empty. Equal verdicts are refined by
/// confidence only when both confidences are present; different verdicts are
/// refined when either one is.
pub fn score_verdicts(
    verdict1: &str,
    verdict2: &str,
    confidence1: &str,
    confidence2: &str,
    high_confidence: &str,
) -> Option<Discordance> {
    if verdict1.is_empty() || verdict2.is_empty() {
        return None;
    }

    let high1 = confidence1 == high_confidence;
    let high2 = confidence2 == high_confidence;

    if verdict1 == verdict2 {
        let (score, label) = if !confidence1.is_empty() && !confidence2.is_empty() {
            if high1 && high2 {
                (0, DiscordanceLabel::SameVerdictBothHigh)
            } else if high1 || high2 {
                (1, DiscordanceLabel::SameVerdictOneHigh)
            } else {
                (0, DiscordanceLabel::SameVerdictZeroHigh)
            }
        } else {
            (0, DiscordanceLabel::SameVerdict)
        };
        Some(Discordance {
            discordant_verdict: false,
            score,
            label,
        })
    } else {
        let (score, label) = if !confidence1.is_empty() || !confidence2.is_empty() {
            if high1 && high2 {
                (4, DiscordanceLabel::DifferentVerdictBothHigh)
            } else if high1 || high2 {
                (3, DiscordanceLabel::DifferentVerdictOneHigh)
            } else {
                (2, DiscordanceLabel::DifferentVerdictZeroHigh)
            }
        } else {
            (2, DiscordanceLabel::DifferentVerdict)
        };
        Some(Discordance {
            discordant_verdict: true,
            score,
            label,
        })
    }
}

/// Plain equality comparison of one generic column.
pub fn diff_values(column: &str, value1: &str, value2: &str, suffix1: &str, suffix2: &str) -> ColumnDiff {
    if value1 == value2 {
        ColumnDiff {
            column: column.to_string(),
            diff: String::new(),
            score: 0,
        }
    } else {
        ColumnDiff {
            column: column.to_string(),
            diff: format!("{value1} ({suffix1}), {value2} ({suffix2})"),
            score: 1,
        }
    }
}

/// Derived values for one joined row. Pure: the row is left untouched.
pub fn score_row(
    row: &JoinedRow,
    plan: &ComparePlan,
    alignment: &Alignment,
    options: &CompareOptions,
) -> RowScore {
    match plan {
        ComparePlan::Default => {
            let (verdict1, verdict2) = pair_values(row, alignment, VERDICT_COLUMN);
            let (confidence1, confidence2) = pair_values(row, alignment, CONFIDENCE_COLUMN);
            RowScore::Verdict(score_verdicts(
                &verdict1,
                &verdict2,
                &confidence1,
                &confidence2,
                &options.high_confidence,
            ))
        }
        ComparePlan::Generic { columns } => RowScore::Columns(
            columns
                .iter()
                .map(|column| {
                    let (v1, v2) = pair_values(row, alignment, column);
                    diff_values(column, &v1, &v2, &options.suffix1, &options.suffix2)
                })
                .collect(),
        ),
    }
}

/// Score every joined row, keeping join order.
pub fn score_all(alignment: Alignment, plan: &ComparePlan, options: &CompareOptions) -> Vec<ScoredRow> {
    let scores: Vec<RowScore> = alignment
        .rows
        .iter()
        .map(|row| score_row(row, plan, &alignment, options))
        .collect();

    alignment
        .rows
        .into_iter()
        .zip(scores)
        .map(|(row, score)| ScoredRow { row, score })
        .collect()
}

fn pair_values(row: &JoinedRow, alignment: &Alignment, base: &str) -> (String, String) {
    match alignment.pair(base) {
        Some(pair) => (
            row.get(&pair.left).as_text().into_owned(),
            row.get(&pair.right).as_text().into_owned(),
        ),
        None => (String::new(), String::new()),
    }
}
