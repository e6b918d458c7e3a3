use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::config::BucketScheme;
use crate::model::task::Task;

/// Time bucket an archived task is shown under. Declaration order is display
/// order, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Older,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::Today,
        Bucket::Yesterday,
        Bucket::ThisWeek,
        Bucket::LastWeek,
        Bucket::ThisMonth,
        Bucket::LastMonth,
        Bucket::Older,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Today => "Today",
            Bucket::Yesterday => "Yesterday",
            Bucket::ThisWeek => "This week",
            Bucket::LastWeek => "Last week",
            Bucket::ThisMonth => "This month",
            Bucket::LastMonth => "Last month",
            Bucket::Older => "Older",
        }
    }
}

/// Classify a record date relative to `today`.
///
/// Missing or unparseable dates land in [`Bucket::Older`]. Dates after
/// `today` count as today.
pub fn classify(date: Option<NaiveDate>, today: NaiveDate, scheme: BucketScheme) -> Bucket {
    let Some(date) = date else {
        return Bucket::Older;
    };
    let days_ago = (today - date).num_days();
    if days_ago <= 0 {
        return Bucket::Today;
    }
    if days_ago == 1 {
        return Bucket::Yesterday;
    }
    match scheme {
        BucketScheme::Calendar => {
            if date.iso_week() == today.iso_week() {
                Bucket::ThisWeek
            } else if date.year() == today.year() && date.month() == today.month() {
                Bucket::ThisMonth
            } else {
                Bucket::Older
            }
        }
        BucketScheme::DayCount => match days_ago {
            2..=7 => Bucket::LastWeek,
            8..=30 => Bucket::LastMonth,
            _ => Bucket::Older,
        },
    }
}

/// One non-empty bucket and its tasks
#[derive(Debug)]
pub struct BucketGroup<'a> {
    pub bucket: Bucket,
    pub tasks: Vec<&'a Task>,
}

/// Order tasks by date, most recent first. Ties keep their input order;
/// undated tasks go last.
pub fn recent_first<'a>(tasks: &[&'a Task]) -> Vec<&'a Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
    sorted
}

/// Group tasks into buckets. Empty buckets are left out; every task lands in
/// exactly one bucket.
pub fn group<'a>(tasks: &[&'a Task], today: NaiveDate, scheme: BucketScheme) -> Vec<BucketGroup<'a>> {
    let sorted = recent_first(tasks);
    let mut groups: Vec<BucketGroup<'a>> = Vec::new();
    for bucket in Bucket::ALL {
        let members: Vec<&Task> = sorted
            .iter()
            .copied()
            .filter(|t| classify(t.parsed_date(), today, scheme) == bucket)
            .collect();
        if !members.is_empty() {
            groups.push(BucketGroup {
                bucket,
                tasks: members,
            });
        }
    }
    groups
}
