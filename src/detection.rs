//! Detector output as seen by the trick tracker.
//!
//! The detector itself lives outside this crate. Each processed frame becomes
//! one [`FrameDetections`] holding the class labels it recognized.

use std::io::BufRead;

use crate::DetectionError;

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    /// Detector confidence, if the source reported one.
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: Some(confidence),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDetections {
    pub detections: Vec<Detection>,
}

impl FrameDetections {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        Self::new(labels.iter().map(|l| Detection::new(l.as_ref())).collect())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.detections.iter().map(|d| d.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Drop detections below `threshold`. Entries without a score are kept.
    pub fn above(mut self, threshold: f32) -> Self {
        self.detections
            .retain(|d| d.confidence.map_or(true, |c| c >= threshold));
        self
    }
}

/// Parse one frame of a detection log.
///
/// Entries are comma separated and take either the detector summary form
/// `<count> <label>` or `<label> [confidence]`.
pub fn parse_frame_line(line: &str, line_no: usize) -> Result<FrameDetections, DetectionError> {
    let mut detections = Vec::new();
    for entry in line.split(',') {
        let tokens: Vec<&str> = entry.split_whitespace().collect();
        let detection = match tokens.as_slice() {
            [] => continue,
            [label] => Detection::new(*label),
            [count, label] if count.parse::<u32>().is_ok() && label.parse::<f32>().is_err() => {
                Detection::new(*label)
            }
            [label, score] => {
                let confidence = score
                    .parse::<f32>()
                    .ok()
                    .filter(|c| (0.0..=1.0).contains(c))
                    .ok_or_else(|| DetectionError::BadConfidence {
                        line: line_no,
                        value: score.to_string(),
                    })?;
                Detection::with_confidence(*label, confidence)
            }
            // free text the detector could not summarize; let the parser reject it
            _ => Detection::new(entry.trim()),
        };
        detections.push(detection);
    }
    Ok(FrameDetections::new(detections))
}

/// Read a whole detection log, one frame per line.
pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<FrameDetections>, DetectionError> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim_start().starts_with('#') {
            continue;
        }
        frames.push(parse_frame_line(&line, i + 1)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_form() {
        let frame = parse_frame_line("1 7C, 2 KC, ", 1).unwrap();
        let labels: Vec<_> = frame.labels().collect();
        assert_eq!(labels, vec!["7C", "KC"]);
        assert!(frame.detections.iter().all(|d| d.confidence.is_none()));
    }

    #[test]
    fn parses_confidence_form() {
        let frame = parse_frame_line("10D 0.91,QS 0.40", 1).unwrap();
        assert_eq!(frame.detections[0], Detection::with_confidence("10D", 0.91));
        assert_eq!(frame.detections[1], Detection::with_confidence("QS", 0.40));
    }

    #[test]
    fn bare_labels_and_blank_line() {
        assert_eq!(
            parse_frame_line("AH", 1).unwrap(),
            FrameDetections::from_labels(&["AH"])
        );
        assert!(parse_frame_line("   ", 1).unwrap().is_empty());
    }

    #[test]
    fn bad_confidence_is_reported_with_line() {
        let err = parse_frame_line("7C high", 4).unwrap_err();
        match err {
            DetectionError::BadConfidence { line, value } => {
                assert_eq!(line, 4);
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn confidence_outside_unit_range_is_rejected() {
        for entry in ["1 2", "7C 1.5", "7C -0.1", "7C NaN"] {
            let err = parse_frame_line(entry, 2).unwrap_err();
            assert!(
                matches!(err, DetectionError::BadConfidence { line: 2, .. }),
                "{entry} gave {err}"
            );
        }
        let frame = parse_frame_line("7C 1.0, 8C 0", 1).unwrap();
        assert_eq!(frame.detections.len(), 2);
    }

    #[test]
    fn long_entries_are_kept_for_the_parser_to_reject() {
        let frame = parse_frame_line("3 of clubs", 1).unwrap();
        assert_eq!(frame.detections[0].label, "3 of clubs");
    }

    #[test]
    fn threshold_filters_scored_detections() {
        let frame = FrameDetections::new(vec![
            Detection::with_confidence("7C", 0.9),
            Detection::with_confidence("8C", 0.2),
            Detection::new("9C"),
        ])
        .above(0.5);
        let labels: Vec<_> = frame.labels().collect();
        assert_eq!(labels, vec!["7C", "9C"]);
    }

    #[test]
    fn reads_log_skipping_comments() {
        let log = "# frame log\n1 7C,\n1 7C, 1 KC,\n\n";
        let frames = read_frames(log.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].labels().count(), 2);
        assert!(frames[2].is_empty());
    }
}
