use crate::error::{EmotionError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// The seven emotion labels reported by facial-expression classifiers.
///
/// The declaration order is significant: score sets iterate in this order and
/// every tie between equal scores or counts resolves to the earliest label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl Emotion {
    /// Number of labels in the enumeration.
    pub const COUNT: usize = 7;

    /// All labels in enumeration order.
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    /// Returns the lower-case wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprise => "surprise",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    /// Position of the label in [`Emotion::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Coarse sentiment bucket of the label.
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::of(*self)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = EmotionError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_ascii_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == label)
            .ok_or_else(|| EmotionError::UnknownEmotion(s.to_string()))
    }
}

/// Coarse business reading of a dominant emotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Happy and surprise read positive; sad, angry and fear negative; the
    /// rest neutral.
    pub fn of(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Happy | Emotion::Surprise => Sentiment::Positive,
            Emotion::Sad | Emotion::Angry | Emotion::Fear => Sentiment::Negative,
            Emotion::Disgust | Emotion::Neutral => Sentiment::Neutral,
        }
    }

    /// Returns the lower-case wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Confidence percentage for each of the seven emotions.
///
/// Values are finite and non-negative. Sets produced by a classifier or by
/// [`EmotionScores::normalized`] sum to 100.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmotionScores([f64; Emotion::COUNT]);

impl EmotionScores {
    /// Builds a score set from values given in enumeration order.
    pub fn new(values: [f64; Emotion::COUNT]) -> Result<Self> {
        for (emotion, value) in Emotion::ALL.into_iter().zip(values) {
            if !value.is_finite() || value < 0.0 {
                return Err(EmotionError::InvalidScore { emotion, value });
            }
        }
        Ok(Self(values))
    }

    pub(crate) fn from_raw(values: [f64; Emotion::COUNT]) -> Self {
        Self(values)
    }

    /// Builds a score set from `label -> percentage` pairs.
    ///
    /// Labels are matched case-insensitively; labels absent from the input
    /// score 0. Unknown labels, and labels given more than once, are
    /// rejected.
    pub fn from_labels<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values = [0.0; Emotion::COUNT];
        let mut seen = [false; Emotion::COUNT];
        for (label, value) in pairs {
            let emotion: Emotion = label.parse()?;
            if std::mem::replace(&mut seen[emotion.index()], true) {
                return Err(EmotionError::DuplicateEmotion(emotion));
            }
            values[emotion.index()] = value;
        }
        Self::new(values)
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0[emotion.index()]
    }

    /// Iterates `(emotion, percentage)` in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().zip(self.0.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// The label with the highest percentage and that percentage.
    ///
    /// Equal maxima resolve to the label earliest in enumeration order.
    pub fn dominant(&self) -> (Emotion, f64) {
        let mut best = (Emotion::ALL[0], self.0[0]);
        for (emotion, value) in self.iter().skip(1) {
            if value > best.1 {
                best = (emotion, value);
            }
        }
        best
    }

    /// Rescales the set so the values sum to 100.
    ///
    /// The last label absorbs the rounding residue so that summing in
    /// enumeration order lands on 100. Returns `None` for an all-zero set.
    pub fn normalized(&self) -> Option<Self> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let mut values = self.0.map(|v| v / total * 100.0);
        let head: f64 = values[..Emotion::COUNT - 1].iter().sum();
        values[Emotion::COUNT - 1] = (100.0 - head).max(0.0);
        Some(Self(values))
    }

    pub fn as_array(&self) -> &[f64; Emotion::COUNT] {
        &self.0
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(e, v)| (e.as_str(), v)))
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        EmotionScores::from_labels(raw.iter().map(|(k, v)| (k.as_str(), *v)))
            .map_err(serde::de::Error::custom)
    }
}

/// Occurrence count per emotion; every label is present, unseen ones at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmotionCounts([usize; Emotion::COUNT]);

impl EmotionCounts {
    pub fn increment(&mut self, emotion: Emotion) {
        self.0[emotion.index()] += 1;
    }

    pub fn get(&self, emotion: Emotion) -> usize {
        self.0[emotion.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, usize)> + '_ {
        Emotion::ALL.into_iter().zip(self.0.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// The most frequent label, earliest in enumeration order on ties.
    ///
    /// An empty histogram ties every label at zero, so it yields the first
    /// label.
    pub fn most_common(&self) -> Emotion {
        let mut best = (Emotion::ALL[0], self.0[0]);
        for (emotion, count) in self.iter().skip(1) {
            if count > best.1 {
                best = (emotion, count);
            }
        }
        best.0
    }
}

impl Serialize for EmotionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(e, c)| (e.as_str(), c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("Happy".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!(" surprise ".parse::<Emotion>().unwrap(), Emotion::Surprise);
        assert!(matches!(
            "contempt".parse::<Emotion>(),
            Err(EmotionError::UnknownEmotion(label)) if label == "contempt"
        ));
    }

    #[test]
    fn dominant_prefers_first_label_on_ties() {
        let scores = EmotionScores::new([10.0, 40.0, 5.0, 40.0, 0.0, 0.0, 5.0]).unwrap();
        assert_eq!(scores.dominant(), (Emotion::Sad, 40.0));
    }

    #[test]
    fn rejects_negative_and_nan_scores() {
        assert!(EmotionScores::new([1.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(EmotionScores::new([f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn from_labels_fills_missing_with_zero() {
        let scores = EmotionScores::from_labels([("happy", 60.0), ("neutral", 40.0)]).unwrap();
        assert_eq!(scores.get(Emotion::Happy), 60.0);
        assert_eq!(scores.get(Emotion::Fear), 0.0);
        assert_eq!(scores.total(), 100.0);
    }

    #[test]
    fn from_labels_rejects_repeated_label() {
        let result = EmotionScores::from_labels([("Happy", 10.0), ("sad", 5.0), ("happy", 90.0)]);
        assert!(matches!(
            result,
            Err(EmotionError::DuplicateEmotion(Emotion::Happy))
        ));
    }

    #[test]
    fn normalized_sums_to_one_hundred() {
        let scores = EmotionScores::new([3.0, 1.0, 1.0, 2.0, 1.0, 1.0, 3.0]).unwrap();
        let normalized = scores.normalized().unwrap();
        assert!((normalized.total() - 100.0).abs() < 1e-9);
        assert!((normalized.get(Emotion::Happy) - 25.0).abs() < 1e-9);

        let zeros = EmotionScores::new([0.0; Emotion::COUNT]).unwrap();
        assert!(zeros.normalized().is_none());
    }

    #[test]
    fn scores_serialize_as_labelled_map() {
        let scores = EmotionScores::from_labels([("happy", 72.5), ("sad", 27.5)]).unwrap();
        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["happy"], 72.5);
        assert_eq!(json["neutral"], 0.0);

        let back: EmotionScores = serde_json::from_value(json).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn most_common_of_empty_histogram_is_first_label() {
        let mut counts = EmotionCounts::default();
        assert_eq!(counts.most_common(), Emotion::Happy);

        counts.increment(Emotion::Neutral);
        counts.increment(Emotion::Angry);
        assert_eq!(counts.most_common(), Emotion::Angry);

        counts.increment(Emotion::Neutral);
        assert_eq!(counts.most_common(), Emotion::Neutral);
    }

    #[test]
    fn sentiment_buckets() {
        assert_eq!(Emotion::Happy.sentiment(), Sentiment::Positive);
        assert_eq!(Emotion::Surprise.sentiment(), Sentiment::Positive);
        assert_eq!(Emotion::Fear.sentiment(), Sentiment::Negative);
        assert_eq!(Emotion::Disgust.sentiment(), Sentiment::Neutral);
    }
}
