//! Non-maximum suppression.

use odr_models::Detection;

/// Class-agnostic greedy non-maximum suppression.
///
/// Candidates with `confidence <= score_threshold` are dropped first. The rest
/// are stable-sorted by confidence (descending, ties keep input order); each
/// kept box suppresses every later box whose IoU with it exceeds
/// `iou_threshold`.
pub fn non_maximum_suppression(
    candidates: Vec<Detection>,
    score_threshold: f32,
    iou_threshold: f32,
) -> Vec<Detection> {
    let mut candidates: Vec<Detection> = candidates
        .into_iter()
        .filter(|d| d.confidence > score_threshold)
        .collect();

    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Detection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let suppressed = keep
            .iter()
            .any(|kept| kept.bbox.iou(&candidate.bbox) > iou_threshold);
        if !suppressed {
            keep.push(candidate);
        }
    }

    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use odr_models::BoundingBox;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, class_id: usize, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), class_id, confidence)
    }

    #[test]
    fn test_empty_input() {
        assert!(non_maximum_suppression(Vec::new(), 0.5, 0.4).is_empty());
    }

    #[test]
    fn test_overlapping_boxes_keep_highest() {
        let kept = non_maximum_suppression(
            vec![
                det(100.0, 100.0, 200.0, 200.0, 0, 0.7),
                det(105.0, 102.0, 205.0, 198.0, 0, 0.9),
                det(98.0, 99.0, 199.0, 203.0, 0, 0.8),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn test_suppression_ignores_class() {
        let kept = non_maximum_suppression(
            vec![
                det(0.0, 0.0, 100.0, 100.0, 0, 0.9),
                det(0.0, 0.0, 100.0, 100.0, 16, 0.8),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_id, 0);
    }

    #[test]
    fn test_separate_objects_survive_in_confidence_order() {
        let kept = non_maximum_suppression(
            vec![
                det(0.0, 0.0, 50.0, 50.0, 0, 0.6),
                det(300.0, 300.0, 350.0, 350.0, 2, 0.95),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].class_id, 2);
        assert_eq!(kept[1].class_id, 0);
    }

    #[test]
    fn test_iou_exactly_at_threshold_is_kept() {
        // IoU = 40 / 100, not strictly above the threshold.
        let kept = non_maximum_suppression(
            vec![
                det(0.0, 0.0, 10.0, 10.0, 0, 0.9),
                det(0.0, 0.0, 10.0, 4.0, 0, 0.8),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_score_prefilter_is_exclusive() {
        let kept = non_maximum_suppression(
            vec![
                det(0.0, 0.0, 10.0, 10.0, 0, 0.5),
                det(50.0, 50.0, 60.0, 60.0, 0, 0.51),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.51);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let kept = non_maximum_suppression(
            vec![
                det(0.0, 0.0, 10.0, 10.0, 3, 0.8),
                det(100.0, 0.0, 110.0, 10.0, 1, 0.8),
                det(200.0, 0.0, 210.0, 10.0, 2, 0.8),
            ],
            0.5,
            0.4,
        );
        let classes: Vec<usize> = kept.iter().map(|d| d.class_id).collect();
        assert_eq!(classes, vec![3, 1, 2]);
    }

    #[test]
    fn test_survivors_never_overlap_above_threshold() {
        let mut candidates = Vec::new();
        for i in 0..20 {
            let offset = (i * 7) as f32;
            candidates.push(det(offset, offset, offset + 60.0, offset + 60.0, i % 3, 0.55 + i as f32 * 0.02));
        }
        let kept = non_maximum_suppression(candidates, 0.5, 0.4);
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                assert!(a.bbox.iou(&b.bbox) <= 0.4);
            }
        }
    }
}
