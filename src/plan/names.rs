/// `<series>_S<nn>`
pub fn season_folder_name(series: &str, season: u32) -> String {
    format!("{}_S{:02}", series, season)
}

/// `<series>_S<nn>E<mm>.<ext>`
pub fn episode_file_name(series: &str, season: u32, episode: u32, extension: &str) -> String {
    format!("{}_S{:02}E{:02}.{}", series, season, episode, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_folder_name_pads() {
        assert_eq!(season_folder_name("Foo", 1), "Foo_S01");
        assert_eq!(season_folder_name("Foo", 12), "Foo_S12");
    }

    #[test]
    fn test_episode_file_name_pads() {
        assert_eq!(episode_file_name("Foo", 1, 2, "mkv"), "Foo_S01E02.mkv");
        assert_eq!(episode_file_name("Foo", 3, 104, "srt"), "Foo_S03E104.srt");
    }

    #[test]
    fn test_series_token_kept_verbatim() {
        assert_eq!(
            season_folder_name("How I Met Your Mother", 9),
            "How I Met Your Mother_S09"
        );
    }
}
