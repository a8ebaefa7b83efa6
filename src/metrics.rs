use crate::emotion::Emotion;
use crate::error::{EmotionError, Result};
use crate::predictor::PredictionResult;
use serde::Serialize;
use std::fmt;

/// Headline scores of a labelled evaluation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub accuracy: f64,
    /// Precision averaged over classes, weighted by true-label support.
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of evaluated samples.
    pub support: usize,
}

/// Counts of (true, predicted) label pairs; rows are true labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[usize; Emotion::COUNT]; Emotion::COUNT],
}

impl ConfusionMatrix {
    pub fn get(&self, truth: Emotion, predicted: Emotion) -> usize {
        self.counts[truth.index()][predicted.index()]
    }

    pub fn rows(&self) -> &[[usize; Emotion::COUNT]; Emotion::COUNT] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..Emotion::COUNT).map(|i| self.counts[i][i]).sum()
    }

    /// Samples whose true label is `emotion`.
    pub fn support(&self, emotion: Emotion) -> usize {
        self.counts[emotion.index()].iter().sum()
    }

    /// Samples predicted as `emotion`.
    pub fn predicted(&self, emotion: Emotion) -> usize {
        self.counts.iter().map(|row| row[emotion.index()]).sum()
    }

    pub fn class_metrics(&self, emotion: Emotion) -> ClassMetrics {
        let hits = self.get(emotion, emotion) as f64;
        let support = self.support(emotion);
        let precision = ratio(hits, self.predicted(emotion) as f64);
        let recall = ratio(hits, support as f64);
        ClassMetrics {
            emotion,
            precision,
            recall,
            f1_score: ratio(2.0 * precision * recall, precision + recall),
            support,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Precision, recall and F1 of a single label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub emotion: Emotion,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Samples whose true label is `emotion`.
    pub support: usize,
}

/// Class metrics averaged over every label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Per-class breakdown over every emotion label, rendered by `Display` as an
/// aligned text table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    pub support: usize,
}

fn check_lengths(y_true: &[Emotion], y_pred: &[Emotion]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(EmotionError::LengthMismatch {
            truth: y_true.len(),
            predicted: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(EmotionError::EmptyLabels);
    }
    Ok(())
}

/// Tallies `(y_true[i], y_pred[i])` pairs. The sequences must be non-empty
/// and of equal length.
pub fn confusion_matrix(y_true: &[Emotion], y_pred: &[Emotion]) -> Result<ConfusionMatrix> {
    check_lengths(y_true, y_pred)?;
    let mut matrix = ConfusionMatrix::default();
    for (truth, predicted) in y_true.iter().zip(y_pred) {
        matrix.counts[truth.index()][predicted.index()] += 1;
    }
    Ok(matrix)
}

/// Per-class metrics with macro and support-weighted averages.
pub fn classification_report(
    y_true: &[Emotion],
    y_pred: &[Emotion],
) -> Result<ClassificationReport> {
    let matrix = confusion_matrix(y_true, y_pred)?;
    let classes: Vec<ClassMetrics> = Emotion::ALL
        .into_iter()
        .map(|emotion| matrix.class_metrics(emotion))
        .collect();

    let total = matrix.total() as f64;
    let average = |weight: &dyn Fn(&ClassMetrics) -> f64| {
        let norm: f64 = classes.iter().map(weight).sum();
        AveragedMetrics {
            precision: ratio(classes.iter().map(|c| weight(c) * c.precision).sum(), norm),
            recall: ratio(classes.iter().map(|c| weight(c) * c.recall).sum(), norm),
            f1_score: ratio(classes.iter().map(|c| weight(c) * c.f1_score).sum(), norm),
        }
    };
    let macro_avg = average(&|_| 1.0);
    let weighted_avg = average(&|c| c.support as f64);

    Ok(ClassificationReport {
        accuracy: ratio(matrix.correct() as f64, total),
        macro_avg,
        weighted_avg,
        support: matrix.total(),
        classes,
    })
}

/// Accuracy plus support-weighted precision, recall and F1.
pub fn calculate_metrics(y_true: &[Emotion], y_pred: &[Emotion]) -> Result<PerformanceMetrics> {
    let report = classification_report(y_true, y_pred)?;
    Ok(PerformanceMetrics {
        accuracy: report.accuracy,
        precision: report.weighted_avg.precision,
        recall: report.weighted_avg.recall,
        f1_score: report.weighted_avg.f1_score,
        support: report.support,
    })
}

/// Pairs each true label with the dominant emotion predicted at the same
/// position, dropping failed predictions.
///
/// Both sequences must have the same length. When no prediction succeeded
/// there is nothing to evaluate and the result is [`EmotionError::EmptyLabels`].
pub fn evaluation_pairs(
    y_true: &[Emotion],
    results: &[PredictionResult],
) -> Result<(Vec<Emotion>, Vec<Emotion>)> {
    if y_true.len() != results.len() {
        return Err(EmotionError::LengthMismatch {
            truth: y_true.len(),
            predicted: results.len(),
        });
    }
    let pairs: (Vec<Emotion>, Vec<Emotion>) = y_true
        .iter()
        .zip(results)
        .filter_map(|(truth, result)| result.dominant_emotion.map(|p| (*truth, p)))
        .unzip();
    if pairs.0.is_empty() {
        return Err(EmotionError::EmptyLabels);
    }
    Ok(pairs)
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = 12usize;
        writeln!(
            f,
            "{:>w$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>w$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                class.emotion.as_str(),
                class.precision,
                class.recall,
                class.f1_score,
                class.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>w$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>w$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1_score, self.support
            )?;
        }
        Ok(())
    }
}
