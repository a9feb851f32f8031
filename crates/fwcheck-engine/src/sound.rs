//! Audio feedback.

use std::path::{Path, PathBuf};

use tracing::debug;

use fwcheck_core::{AudioSettings, CheckResult, Verdict};

use crate::sink::ResultSink;

/// Which sound to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Matched version
    Ok,
    /// Mismatch or operator error
    Wrong,
}

/// Fire-and-forget sound playback.
///
/// Playback is an external process; spawn failures and missing files are
/// ignored. Feedback must never slow down or break a check.
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    enabled: bool,
    ok_sound: PathBuf,
    wrong_sound: PathBuf,
}

impl SoundPlayer {
    /// Build a player from configuration.
    pub fn from_config(settings: &AudioSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ok_sound: settings.ok_sound.clone(),
            wrong_sound: settings.wrong_sound.clone(),
        }
    }

    /// The cue for a verdict, if that verdict makes a sound.
    pub fn cue_for(verdict: Verdict) -> Option<SoundCue> {
        match verdict {
            Verdict::Ok => Some(SoundCue::Ok),
            Verdict::Ng | Verdict::Error => Some(SoundCue::Wrong),
            Verdict::NotFound | Verdict::Skip => None,
        }
    }

    /// Play a cue.
    pub fn play(&self, cue: SoundCue) {
        if !self.enabled {
            return;
        }

        let path = match cue {
            SoundCue::Ok => &self.ok_sound,
            SoundCue::Wrong => &self.wrong_sound,
        };
        if !path.exists() {
            debug!("sound file missing, skipping: {}", path.display());
            return;
        }

        Self::spawn_player(path);
    }

    /// Play via the Windows Presentation MediaPlayer. No extra runtime
    /// dependency is needed for the packaged binary.
    #[cfg(target_os = "windows")]
    fn spawn_player(path: &Path) {
        use std::process::{Command, Stdio};

        let escaped = path.display().to_string().replace('\'', "''");
        let script = format!(
            "Add-Type -AssemblyName presentationCore; \
             $p=New-Object system.windows.media.mediaplayer; \
             $p.Open([uri]'{escaped}'); \
             $p.Play(); \
             Start-Sleep -Milliseconds 900;"
        );

        let _ = Command::new("powershell")
            .args(["-NoProfile", "-WindowStyle", "Hidden", "-Command", &script])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(not(target_os = "windows"))]
    fn spawn_player(path: &Path) {
        debug!("audio feedback is Windows-only, skipping {}", path.display());
    }
}

/// Sink turning verdicts into sounds.
pub struct AudioSink {
    player: SoundPlayer,
}

impl AudioSink {
    /// Wrap a player.
    pub fn new(player: SoundPlayer) -> Self {
        Self { player }
    }
}

impl ResultSink for AudioSink {
    fn publish(&self, result: &CheckResult, _modal: bool) {
        if let Some(cue) = SoundPlayer::cue_for(result.verdict) {
            self.player.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(SoundPlayer::cue_for(Verdict::Ok), Some(SoundCue::Ok));
        assert_eq!(SoundPlayer::cue_for(Verdict::Ng), Some(SoundCue::Wrong));
        assert_eq!(SoundPlayer::cue_for(Verdict::Error), Some(SoundCue::Wrong));
        assert_eq!(SoundPlayer::cue_for(Verdict::NotFound), None);
        assert_eq!(SoundPlayer::cue_for(Verdict::Skip), None);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let player = SoundPlayer::from_config(&AudioSettings {
            enabled: true,
            ok_sound: PathBuf::from("definitely/not/here.mp3"),
            wrong_sound: PathBuf::from("also/not/here.mp3"),
        });
        player.play(SoundCue::Ok);
        player.play(SoundCue::Wrong);
    }

    #[test]
    fn test_disabled_player_is_silent() {
        let player = SoundPlayer::from_config(&AudioSettings {
            enabled: false,
            ..Default::default()
        });
        player.play(SoundCue::Ok);
    }

    #[test]
    fn test_audio_sink_ignores_silent_verdicts() {
        let sink = AudioSink::new(SoundPlayer::from_config(&AudioSettings::default()));
        let result = CheckResult::new("1", None, Verdict::Skip, "skip");
        sink.publish(&result, false);
    }
}
