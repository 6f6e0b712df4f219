//! Currently-playing media lookup seam.
//!
//! The compiler itself never touches this; hosts use it to pick which
//! preset to compile for the track the listener currently hears. The
//! trait is the seam for platform integrations — only a deterministic
//! in-memory source ships here.

use std::fmt;

/// Metadata of the currently playing track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub artist: String,
    pub title: String,
}

impl NowPlaying {
    /// The key a host uses to pick a preset for this track.
    pub fn preset_key(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaError {
    /// No media session is currently active.
    NoActiveSession,
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::NoActiveSession => f.write_str("no active media session"),
        }
    }
}

impl std::error::Error for MediaError {}

/// Source of currently-playing metadata.
pub trait MediaSource {
    fn now_playing(&self) -> Result<NowPlaying, MediaError>;
}

/// A fixed source: always reports the same track, or no session at all.
/// Useful for hosts without a platform integration and for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedMedia {
    track: Option<NowPlaying>,
}

impl FixedMedia {
    pub fn playing(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            track: Some(NowPlaying {
                artist: artist.into(),
                title: title.into(),
            }),
        }
    }

    pub fn silent() -> Self {
        Self { track: None }
    }
}

impl MediaSource for FixedMedia {
    fn now_playing(&self) -> Result<NowPlaying, MediaError> {
        self.track.clone().ok_or(MediaError::NoActiveSession)
    }
}
