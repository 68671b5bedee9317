use chrono::{DateTime, Utc};
use serde::Serialize;

pub(crate) const MIN_SEGMENT_SECONDS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentType {
    Trash,
    #[serde(rename = "Boss")]
    BossEncounter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub segment_type: SegmentType,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub relative_start_offset_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_id: Option<u32>,
}

impl TimelineSegment {
    fn duration_seconds(&self, end_time: DateTime<Utc>) -> i64 {
        (end_time - self.start_time).num_seconds()
    }
}

/// Ordered, contiguous segments of a dungeon run. Closing a segment shorter
/// than ten seconds discards it, and its start carries over to whatever
/// opens next so no gap is left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    encounter_start: DateTime<Utc>,
    segments: Vec<TimelineSegment>,
    open_segment: Option<TimelineSegment>,
    carried_start: Option<DateTime<Utc>>,
}

impl Timeline {
    pub fn new(encounter_start: DateTime<Utc>) -> Self {
        Self {
            encounter_start,
            segments: Vec::new(),
            open_segment: None,
            carried_start: None,
        }
    }

    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    pub fn current(&self) -> Option<&TimelineSegment> {
        self.open_segment.as_ref()
    }

    pub fn current_type(&self) -> Option<SegmentType> {
        self.open_segment.as_ref().map(|segment| segment.segment_type)
    }

    pub fn last_boss_segment(&self) -> Option<&TimelineSegment> {
        self.open_segment
            .iter()
            .chain(self.segments.iter().rev())
            .find(|segment| segment.segment_type == SegmentType::BossEncounter)
    }

    /// Closes the open segment at `at` and opens a new one starting there.
    pub fn open(&mut self, segment_type: SegmentType, at: DateTime<Utc>, boss_id: Option<u32>) {
        self.close(at);

        let start_time = self.carried_start.take().unwrap_or(at);

        if let Some(previous) = self.segments.last() {
            let continues_previous = previous.segment_type == segment_type
                && previous.boss_id == boss_id
                && previous.end_time == Some(start_time);

            if continues_previous {
                let mut reopened = self.segments.pop();
                if let Some(segment) = reopened.as_mut() {
                    segment.end_time = None;
                }
                self.open_segment = reopened;
                return;
            }
        }

        self.open_segment = Some(TimelineSegment {
            segment_type,
            start_time,
            end_time: None,
            relative_start_offset_seconds: seconds_between(self.encounter_start, start_time),
            boss_id,
        });
    }

    pub fn close(&mut self, at: DateTime<Utc>) {
        let Some(mut segment) = self.open_segment.take() else {
            return;
        };

        let end_time = at.max(segment.start_time);

        if segment.duration_seconds(end_time) < MIN_SEGMENT_SECONDS {
            tracing::debug!(
                segment_type = ?segment.segment_type,
                duration_seconds = segment.duration_seconds(end_time),
                "Discarding short timeline segment"
            );
            self.carried_start = Some(segment.start_time);
            return;
        }

        segment.end_time = Some(end_time);
        self.segments.push(segment);
    }

    pub fn finish(&mut self, at: DateTime<Utc>) -> Vec<TimelineSegment> {
        self.close(at);
        self.carried_start = None;
        self.segments.clone()
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::{SegmentType, Timeline, TimelineSegment, MIN_SEGMENT_SECONDS};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 20, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn assert_contiguous_and_long(segments: &[TimelineSegment]) {
        for segment in segments {
            let end = segment.end_time.expect("Retained segments must be closed");
            assert!(
                (end - segment.start_time).num_seconds() >= MIN_SEGMENT_SECONDS,
                "Retained segment shorter than the minimum: {segment:?}"
            );
        }
        for pair in segments.windows(2) {
            assert_eq!(
                pair[0].end_time,
                Some(pair[1].start_time),
                "Segments must be contiguous"
            );
        }
    }

    #[test]
    fn trash_boss_trash_sequence_is_contiguous() {
        let mut timeline = Timeline::new(at(0));
        timeline.open(SegmentType::Trash, at(0), None);
        timeline.open(SegmentType::BossEncounter, at(120), Some(7));
        timeline.open(SegmentType::Trash, at(240), None);

        let segments = timeline.finish(at(400));

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].segment_type, SegmentType::BossEncounter);
        assert_eq!(segments[1].boss_id, Some(7));
        assert_eq!(segments[1].relative_start_offset_seconds, 120.0);
        assert_contiguous_and_long(&segments);
    }

    #[test]
    fn spurious_boss_segment_is_folded_back_into_trash() {
        let mut timeline = Timeline::new(at(0));
        timeline.open(SegmentType::Trash, at(0), None);
        timeline.open(SegmentType::BossEncounter, at(60), Some(7));
        timeline.open(SegmentType::Trash, at(64), None);

        let segments = timeline.finish(at(200));

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].segment_type, SegmentType::Trash);
        assert_eq!(segments[0].start_time, at(0));
        assert_eq!(segments[0].end_time, Some(at(200)));
    }

    #[test]
    fn short_first_segment_hands_its_start_to_the_next() {
        let mut timeline = Timeline::new(at(0));
        timeline.open(SegmentType::Trash, at(0), None);
        timeline.open(SegmentType::BossEncounter, at(4), Some(9));

        let segments = timeline.finish(at(100));

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_time, at(0));
        assert_eq!(segments[0].relative_start_offset_seconds, 0.0);
        assert_contiguous_and_long(&segments);
    }

    #[test]
    fn short_trailing_segment_is_dropped() {
        let mut timeline = Timeline::new(at(0));
        timeline.open(SegmentType::Trash, at(0), None);
        timeline.open(SegmentType::BossEncounter, at(300), Some(3));

        let segments = timeline.finish(at(305));

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_time, Some(at(300)));
    }

    #[test]
    fn last_boss_segment_prefers_the_open_one() {
        let mut timeline = Timeline::new(at(0));
        timeline.open(SegmentType::Trash, at(0), None);
        timeline.open(SegmentType::BossEncounter, at(30), Some(1));
        timeline.open(SegmentType::Trash, at(90), None);
        timeline.open(SegmentType::BossEncounter, at(150), Some(2));

        let last = timeline
            .last_boss_segment()
            .expect("Expected an open boss segment");
        assert_eq!(last.boss_id, Some(2));
        assert_eq!(timeline.current_type(), Some(SegmentType::BossEncounter));
    }
}
