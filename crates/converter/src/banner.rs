//! Startup banner.

use crate::jobs::RunMode;

pub const APP_NAME: &str = "Video Converter";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COPYRIGHT: &str = "Copyright 2024 the vidconv developers";

const RULE: &str = "----------------------------------------------------------------------";

/// Banner printed before anything else, ending with a blank line.
pub fn render_banner(mode: RunMode) -> String {
    format!(
        "{rule}\n {name} {version}\n\n {description}\n\n {copyright}\n{rule}\n\n",
        rule = RULE,
        name = APP_NAME,
        version = APP_VERSION,
        description = mode.description(),
        copyright = COPYRIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_mentions_mode() {
        let convert = render_banner(RunMode::ResolutionConvert);
        assert!(convert.starts_with(RULE));
        assert!(convert.contains(&format!(" {} {}", APP_NAME, APP_VERSION)));
        assert!(convert.contains("H264/AAC"));
        assert!(convert.ends_with(&format!("{}\n\n", RULE)));

        let extract = render_banner(RunMode::AudioExtract);
        assert!(extract.contains("Codec is mp3"));
        assert!(extract.contains(COPYRIGHT));
    }
}
