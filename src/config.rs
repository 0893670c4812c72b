use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Rendered phrase must appear as a contiguous substring of the title.
    Exact,
    /// Every whitespace-separated token of the phrase must appear, in any order.
    Flexible,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Flexible => "flexible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub channel_url: String,
    /// May contain `{lesson}`, `{quarter}` and `{year}` placeholders.
    pub title_template: String,
    pub match_mode: MatchMode,
}

impl ChannelSpec {
    pub fn new(channel_url: &str, title_template: &str, match_mode: MatchMode) -> Self {
        Self {
            channel_url: channel_url.to_string(),
            title_template: title_template.to_string(),
            match_mode,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub channels: Vec<ChannelSpec>,
    pub format_spec: String,
    pub catalog_depth: usize,
    pub ytdlp_bin: String,
    /// `{date}` is replaced with the ISO date of the lesson day.
    pub audio_url_template: String,
    pub http_connect_timeout: Duration,
    pub http_read_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            format_spec: "bv[vcodec^=avc1][height<=720]+ba[acodec^=mp4a]".to_string(),
            catalog_depth: 10,
            ytdlp_bin: "yt-dlp".to_string(),
            audio_url_template: "https://d7dlhz1yjc01y.cloudfront.net/audio/en/lessons/{date}.mp3"
                .to_string(),
            http_connect_timeout: Duration::from_secs(10),
            http_read_timeout: Duration::from_secs(10),
        }
    }
}

fn default_channels() -> Vec<ChannelSpec> {
    vec![
        ChannelSpec::new(
            "https://www.youtube.com/@hopeSabbathSchool/videos",
            "Lesson {lesson}:",
            MatchMode::Exact,
        ),
        ChannelSpec::new(
            "https://www.youtube.com/@3ABNSabbathSchoolPanelOfficial/videos",
            "Lesson {lesson} Q{quarter} {year}",
            MatchMode::Exact,
        ),
        ChannelSpec::new(
            "https://www.youtube.com/c/Cl%C3%A1udioCarneiro/videos",
            "{year} Q{quarter} Lesson {lesson} \u{2013}",
            MatchMode::Exact,
        ),
        ChannelSpec::new(
            "https://www.youtube.com/@itiswritten/videos",
            "{year} Q{quarter} Lesson {lesson}: ",
            MatchMode::Exact,
        ),
        ChannelSpec::new(
            "https://www.youtube.com/@SecretsUnsealedMinistry/videos",
            "Lesson {lesson}: ",
            MatchMode::Exact,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_tracks_five_channels_with_placeholders() {
        let config = AppConfig::default();
        assert_eq!(config.channels.len(), 5);
        assert!(
            config
                .channels
                .iter()
                .all(|channel| channel.title_template.contains("{lesson}"))
        );
        assert_eq!(config.catalog_depth, 10);
        assert!(config.audio_url_template.contains("{date}"));
    }
}
