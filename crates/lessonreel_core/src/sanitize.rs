use crate::types::*;

pub const MIN_PLAYBACK_SPEED: f64 = 0.1;
pub const MAX_PLAYBACK_SPEED: f64 = 16.0;
pub const MIN_FONT_SIZE: f64 = 1.0;

/// `value` if finite, otherwise `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Finite and >= 0; NaN/inf fall back to `fallback` (itself floored at 0).
pub fn non_negative(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).max(0.0)
}

/// Clamp into `0..=100`; NaN becomes `fallback`.
pub fn percent(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).clamp(0.0, 100.0)
}

pub fn playback_speed(value: f64) -> f64 {
    finite_or(value, 1.0).clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED)
}

/// Source durations must be long enough to hold a minimal trim window.
pub fn source_duration(value: f64, fallback: f64) -> f64 {
    let v = finite_or(value, fallback);
    let v = if v < MIN_SPAN {
        finite_or(fallback, MIN_SPAN).max(MIN_SPAN)
    } else {
        v
    };
    v.min(MAX_TIMELINE_SECONDS)
}

fn optional_extent(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

pub fn normalize_placement(placement: &mut Placement) {
    placement.position_start =
        non_negative(placement.position_start, 0.0).min(MAX_TIMELINE_SECONDS - MIN_SPAN);
    let min_end = placement.position_start + MIN_SPAN;
    placement.position_end =
        finite_or(placement.position_end, min_end).min(MAX_TIMELINE_SECONDS).max(min_end);
    placement.opacity = percent(placement.opacity, 100.0);
}

pub fn normalize_transform(transform: &mut Transform) {
    transform.x = finite_or(transform.x, 0.0);
    transform.y = finite_or(transform.y, 0.0);
    transform.width = optional_extent(transform.width);
    transform.height = optional_extent(transform.height);
    transform.rotation = finite_or(transform.rotation, 0.0);
}

/// Enforce `0 <= start_time < end_time <= source_duration`.
pub fn normalize_trim(trim: &mut SourceTrim) {
    trim.source_duration = source_duration(trim.source_duration, MIN_SPAN);
    trim.playback_speed = playback_speed(trim.playback_speed);

    let max_start = trim.source_duration - MIN_SPAN;
    trim.start_time = non_negative(trim.start_time, 0.0).min(max_start);

    let min_end = (trim.start_time + MIN_SPAN).min(trim.source_duration);
    trim.end_time = finite_or(trim.end_time, trim.source_duration)
        .clamp(min_end, trim.source_duration);
}

pub fn normalize_style(style: &mut TextStyle) {
    style.font_size = finite_or(style.font_size, TextStyle::default().font_size).max(MIN_FONT_SIZE);
    style.font_weight = style.font_weight.clamp(100, 900);
    if style
        .background_color
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        style.background_color = None;
    }
}

/// Bring an element back inside its type's invariants.
pub fn normalize_element(element: &mut Element) {
    normalize_placement(element.placement_mut());
    if let Some(transform) = element.transform_mut() {
        normalize_transform(transform);
    }
    if let Some(trim) = element.source_mut() {
        normalize_trim(trim);
    }
    if let Some(volume) = element.volume_mut() {
        *volume = percent(*volume, 100.0);
    }
    if let Element::Text {
        style,
        animation_duration,
        ..
    } = element
    {
        normalize_style(style);
        *animation_duration = non_negative(*animation_duration, 0.0);
    }
}

/// Check every committed-element invariant without modifying anything.
pub fn is_valid(element: &Element) -> bool {
    let p = element.placement();
    let placement_ok = p.position_start.is_finite()
        && p.position_start >= 0.0
        && p.position_end > p.position_start
        && (0.0..=100.0).contains(&p.opacity);
    let trim_ok = element.source().map_or(true, |t| {
        t.start_time >= 0.0
            && t.start_time < t.end_time
            && t.end_time <= t.source_duration
            && t.playback_speed > 0.0
    });
    placement_ok && trim_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_trim(start: f64, end: f64, duration: f64) -> SourceTrim {
        SourceTrim {
            source_locator: "clip.mp4".to_string(),
            content_kind: "video/mp4".to_string(),
            source_duration: duration,
            start_time: start,
            end_time: end,
            playback_speed: 1.0,
        }
    }

    #[test]
    fn finite_or_replaces_nan_and_inf() {
        assert_eq!(finite_or(f64::NAN, 2.0), 2.0);
        assert_eq!(finite_or(f64::INFINITY, 2.0), 2.0);
        assert_eq!(finite_or(1.5, 2.0), 1.5);
    }

    #[test]
    fn percent_clamps() {
        assert_eq!(percent(140.0, 100.0), 100.0);
        assert_eq!(percent(-3.0, 100.0), 0.0);
        assert_eq!(percent(f64::NAN, 100.0), 100.0);
    }

    #[test]
    fn playback_speed_never_reaches_zero() {
        assert_eq!(playback_speed(0.0), MIN_PLAYBACK_SPEED);
        assert_eq!(playback_speed(-2.0), MIN_PLAYBACK_SPEED);
        assert_eq!(playback_speed(f64::NAN), 1.0);
        assert_eq!(playback_speed(100.0), MAX_PLAYBACK_SPEED);
    }

    #[test]
    fn placement_end_pushed_past_start() {
        let mut p = Placement {
            position_start: 4.0,
            position_end: 2.0,
            z_index: 0,
            opacity: 100.0,
        };
        normalize_placement(&mut p);
        assert!(p.position_end > p.position_start);
        assert!((p.position_end - (4.0 + MIN_SPAN)).abs() < 1e-12);
    }

    #[test]
    fn placement_negative_start_clamped_to_zero() {
        let mut p = Placement {
            position_start: -1.0,
            position_end: f64::NAN,
            z_index: 0,
            opacity: 250.0,
        };
        normalize_placement(&mut p);
        assert_eq!(p.position_start, 0.0);
        assert!(p.position_end > 0.0);
        assert_eq!(p.opacity, 100.0);
    }

    #[test]
    fn huge_placement_start_keeps_a_positive_span() {
        let mut p = Placement {
            position_start: 1e17,
            position_end: f64::NAN,
            z_index: 0,
            opacity: 100.0,
        };
        normalize_placement(&mut p);
        assert_eq!(p.position_start, MAX_TIMELINE_SECONDS - MIN_SPAN);
        assert!(p.position_end > p.position_start);
        assert!(is_valid(&Element::Text {
            id: Uuid::new_v4(),
            placement: p,
            transform: Transform::default(),
            text: "Late fact".to_string(),
            style: TextStyle::default(),
            animation: TextAnimation::None,
            animation_duration: 0.0,
        }));
    }

    #[test]
    fn huge_placement_end_capped() {
        let mut p = Placement {
            position_start: 2.0,
            position_end: 1e300,
            z_index: 0,
            opacity: 100.0,
        };
        normalize_placement(&mut p);
        assert_eq!(p.position_end, MAX_TIMELINE_SECONDS);
    }

    #[test]
    fn huge_source_duration_capped() {
        let mut t = make_trim(1e17, f64::INFINITY, 1e18);
        normalize_trim(&mut t);
        assert_eq!(t.source_duration, MAX_TIMELINE_SECONDS);
        assert!(t.start_time < t.end_time);
        assert!(t.end_time <= t.source_duration);
    }

    #[test]
    fn trim_clamped_into_source() {
        let mut t = make_trim(-1.0, 20.0, 10.0);
        normalize_trim(&mut t);
        assert_eq!(t.start_time, 0.0);
        assert_eq!(t.end_time, 10.0);
    }

    #[test]
    fn trim_start_past_end_keeps_ordering() {
        let mut t = make_trim(12.0, 3.0, 10.0);
        normalize_trim(&mut t);
        assert!(t.start_time < t.end_time);
        assert!(t.end_time <= t.source_duration);
    }

    #[test]
    fn zero_width_transform_extent_dropped() {
        let mut tf = Transform {
            x: f64::NAN,
            y: 4.0,
            width: Some(0.0),
            height: Some(120.0),
            rotation: f64::INFINITY,
        };
        normalize_transform(&mut tf);
        assert_eq!(tf.x, 0.0);
        assert_eq!(tf.width, None);
        assert_eq!(tf.height, Some(120.0));
        assert_eq!(tf.rotation, 0.0);
    }

    #[test]
    fn normalize_element_fixes_every_field() {
        let mut e = Element::Video {
            id: Uuid::new_v4(),
            placement: Placement {
                position_start: 2.0,
                position_end: 1.0,
                z_index: 0,
                opacity: -5.0,
            },
            transform: Transform::default(),
            source: make_trim(3.0, 1.0, 8.0),
            volume: 400.0,
        };
        assert!(!is_valid(&e));
        normalize_element(&mut e);
        assert!(is_valid(&e));
        assert_eq!(e.volume(), Some(100.0));
        assert_eq!(e.placement().opacity, 0.0);
    }

    #[test]
    fn empty_background_color_is_cleared() {
        let mut style = TextStyle {
            background_color: Some("  ".to_string()),
            font_size: -4.0,
            ..TextStyle::default()
        };
        normalize_style(&mut style);
        assert_eq!(style.background_color, None);
        assert_eq!(style.font_size, MIN_FONT_SIZE);
    }
}
