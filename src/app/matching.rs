use crate::config::{ChannelSpec, MatchMode};
use crate::error::CatalogError;

use super::catalog::{VideoCatalog, VideoEntry, watch_url};
use super::cycle::LessonCycle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatchResult {
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) video_id: String,
}

#[derive(Debug)]
pub(crate) struct ChannelMatches {
    pub(crate) phrase: String,
    pub(crate) result: Result<Vec<MatchResult>, CatalogError>,
}

pub(crate) fn render_phrase(template: &str, cycle: LessonCycle) -> String {
    template
        .replace("{lesson}", &cycle.lesson.to_string())
        .replace("{quarter}", &cycle.quarter.to_string())
        .replace("{year}", &cycle.year.to_string())
}

pub(crate) fn title_matches(phrase: &str, title: &str, mode: MatchMode) -> bool {
    let phrase = phrase.to_lowercase();
    let title = title.to_lowercase();
    match mode {
        MatchMode::Exact => title.contains(&phrase),
        MatchMode::Flexible => phrase.split_whitespace().all(|token| title.contains(token)),
    }
}

/// Keeps the catalog's order, which is most recent first.
pub(crate) fn match_entries<I>(
    spec: &ChannelSpec,
    cycle: LessonCycle,
    entries: I,
) -> Vec<MatchResult>
where
    I: IntoIterator<Item = VideoEntry>,
{
    let phrase = render_phrase(&spec.title_template, cycle);
    entries
        .into_iter()
        .filter(|entry| title_matches(&phrase, &entry.title, spec.match_mode))
        .map(|entry| MatchResult {
            url: watch_url(&entry.id),
            title: entry.title,
            video_id: entry.id,
        })
        .collect()
}

/// A catalog failure is carried in the result; it never stops other channels.
pub(crate) fn match_channel(
    catalog: &dyn VideoCatalog,
    spec: &ChannelSpec,
    cycle: LessonCycle,
) -> ChannelMatches {
    let phrase = render_phrase(&spec.title_template, cycle);
    let result = catalog
        .recent_videos(&spec.channel_url)
        .map(|entries| match_entries(spec, cycle, entries));
    ChannelMatches { phrase, result }
}
