//! Render-ready view models for the task list.
//!
//! Everything here is a pure function of `(task, now, timezone, theme)` —
//! the widget host decides when to redraw, so nothing may be cached or
//! depend on hidden state.

use std::fmt;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use ratatui::style::Color;

use crate::store::Task;
use crate::theme::WidgetTheme;

/// Label rendered when a due date fails to parse. Deliberately visible so
/// bad data in the store shows up on screen instead of silently losing the
/// time field. Distinct from a hidden label.
pub const PARSE_FAILURE_LABEL: &str = "F";

// ─── View model ───────────────────────────────────────────────────────────────

/// Whether a due time is worth showing for a task, and what it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueTimeLabel {
    Shown(String),
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskViewModel {
    pub title:          String,
    pub description:    String,
    pub priority_color: Color,
    pub due_time:       DueTimeLabel,
}

// ─── Priority color ───────────────────────────────────────────────────────────

/// Maps a priority (1 = most urgent) onto the theme's 4-slot palette.
/// Out-of-range values clamp to the fallback slot; this never fails.
pub fn priority_color(priority: i64, theme: &WidgetTheme) -> Color {
    let palette = theme.priority_palette();
    if (1..=4).contains(&priority) {
        palette[(priority - 1) as usize]
    } else {
        palette[3]
    }
}

// ─── Due-time visibility ──────────────────────────────────────────────────────

/// Decides whether a task's due time is shown, following a fixed order:
/// unparseable text surfaces the [`PARSE_FAILURE_LABEL`] sentinel, future
/// instants are left to the overdue/upcoming indicator, and timestamps that
/// land on local midnight are treated as date-only deadlines with no time
/// worth showing. Anything else formats as a 12-hour clock, e.g. "6:00 PM".
///
/// The timezone is a parameter so callers stay deterministic; production
/// passes `chrono::Local`.
pub fn due_time_label<Tz>(due: Option<&str>, now: DateTime<Utc>, tz: &Tz) -> DueTimeLabel
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(raw) = due else {
        return DueTimeLabel::Hidden;
    };

    // Requires an explicit UTC offset; fractional seconds are accepted but
    // not mandatory.
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return DueTimeLabel::Shown(PARSE_FAILURE_LABEL.to_owned());
    };

    if parsed > now {
        return DueTimeLabel::Hidden;
    }

    let local = parsed.with_timezone(tz);
    if local.hour() == 0 && local.minute() == 0 && local.second() == 0 {
        // Bare dates round-trip as local midnight; "12:00 AM" would suggest
        // a deadline the user never set.
        return DueTimeLabel::Hidden;
    }

    DueTimeLabel::Shown(local.format("%-I:%M %p").to_string())
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Builds the render-ready view model for one task. Invoked once per task
/// per draw; recomputes everything from scratch.
pub fn present<Tz>(task: &Task, now: DateTime<Utc>, tz: &Tz, theme: &WidgetTheme) -> TaskViewModel
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    TaskViewModel {
        title:          task.title.clone(),
        description:    task.description.clone(),
        priority_color: priority_color(task.priority, theme),
        due_time:       due_time_label(task.due.as_deref(), now, tz),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid test instant")
    }

    fn task(due: Option<&str>, priority: i64) -> Task {
        Task {
            id:          "t-1".into(),
            title:       "Task 1".into(),
            description: "Description 1".into(),
            due:         due.map(str::to_owned),
            priority,
            completed:   false,
        }
    }

    #[test]
    fn priorities_map_onto_palette_in_order() {
        let theme   = WidgetTheme::default();
        let palette = theme.priority_palette();
        for p in 1..=4 {
            assert_eq!(priority_color(p, &theme), palette[(p - 1) as usize]);
        }
    }

    #[test]
    fn out_of_range_priorities_fall_back() {
        let theme    = WidgetTheme::default();
        let fallback = theme.priority_palette()[3];
        for p in [-3, 0, 5, 99, i64::MIN, i64::MAX] {
            assert_eq!(priority_color(p, &theme), fallback);
        }
    }

    #[test]
    fn malformed_due_date_surfaces_the_sentinel() {
        let now = utc("2024-08-09T12:00:00Z");
        assert_eq!(
            due_time_label(Some("not-a-date"), now, &Utc),
            DueTimeLabel::Shown("F".into())
        );
    }

    #[test]
    fn missing_offset_counts_as_malformed() {
        let now = utc("2024-08-09T12:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T18:00:00"), now, &Utc),
            DueTimeLabel::Shown("F".into())
        );
    }

    #[test]
    fn future_due_times_are_hidden() {
        let now = utc("2024-08-09T12:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T20:23:18.768Z"), now, &Utc),
            DueTimeLabel::Hidden
        );
    }

    #[test]
    fn past_due_time_formats_as_twelve_hour_clock() {
        let now = utc("2024-08-10T00:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T18:00:00.000Z"), now, &Utc),
            DueTimeLabel::Shown("6:00 PM".into())
        );
    }

    #[test]
    fn fractional_seconds_are_optional() {
        let now = utc("2024-08-10T00:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T18:00:00Z"), now, &Utc),
            DueTimeLabel::Shown("6:00 PM".into())
        );
    }

    #[test]
    fn morning_times_get_an_am_suffix() {
        let now = utc("2024-08-10T00:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T09:05:00.000Z"), now, &Utc),
            DueTimeLabel::Shown("9:05 AM".into())
        );
    }

    #[test]
    fn local_midnight_means_date_only_and_is_hidden() {
        let now = utc("2024-08-10T12:00:00Z");
        assert_eq!(
            due_time_label(Some("2024-08-09T00:00:00.000Z"), now, &Utc),
            DueTimeLabel::Hidden
        );
    }

    #[test]
    fn midnight_check_uses_the_supplied_timezone() {
        let now = utc("2024-08-10T12:00:00Z");
        // 23:00 at -01:00 is exactly midnight UTC...
        let due = Some("2024-08-09T23:00:00.000-01:00");
        assert_eq!(due_time_label(due, now, &Utc), DueTimeLabel::Hidden);
        // ...but in its own zone it is a real 11 PM deadline.
        let minus_one = FixedOffset::west_opt(3600).unwrap();
        assert_eq!(
            due_time_label(due, now, &minus_one),
            DueTimeLabel::Shown("11:00 PM".into())
        );
    }

    #[test]
    fn absent_due_date_is_hidden() {
        let now = utc("2024-08-09T12:00:00Z");
        assert_eq!(due_time_label(None, now, &Utc), DueTimeLabel::Hidden);
    }

    #[test]
    fn present_passes_text_through_and_is_idempotent() {
        let theme = WidgetTheme::default();
        let now   = utc("2024-08-10T00:00:00Z");
        let t     = task(Some("2024-08-09T18:00:00.000Z"), 1);

        let first  = present(&t, now, &Utc, &theme);
        let second = present(&t, now, &Utc, &theme);

        assert_eq!(first.title, "Task 1");
        assert_eq!(first.description, "Description 1");
        assert_eq!(first.priority_color, theme.priority_palette()[0]);
        assert_eq!(first.due_time, DueTimeLabel::Shown("6:00 PM".into()));
        assert_eq!(first, second);
    }
}
