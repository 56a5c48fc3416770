//! Pre-built report scenarios for testing.
//!
//! These reports mirror what `powercfg /requests` prints for various host
//! states, including its CRLF line endings.

use super::runner::MockRunner;

/// A media player and a browser keep the display on; other sections are busy
/// with requests that must be ignored.
pub const TYPICAL_REPORT: &str = "\
DISPLAY:\r
[PROCESS] \\Device\\HarddiskVolume3\\Program Files\\VideoLAN\\VLC\\vlc.exe\r
Video Wake Lock\r
[PROCESS] \\Device\\HarddiskVolume3\\Program Files\\Google\\Chrome\\Application\\chrome.exe\r
Playing video\r
\r
SYSTEM:\r
[DRIVER] Realtek High Definition Audio (HDAUDIO\\FUNC_01&VEN_10EC&DEV_0295&SUBSYS_10280A20&REV_1000\\4&1e1d4f2a&0&0001)\r
An audio stream is currently in use.\r
[PROCESS] \\Device\\HarddiskVolume3\\Program Files\\VideoLAN\\VLC\\vlc.exe\r
Video Wake Lock\r
\r
AWAYMODE:\r
None.\r
\r
EXECUTION:\r
[PROCESS] \\Device\\HarddiskVolume3\\Windows\\System32\\svchost.exe\r
Windows Update\r
\r
PERFBOOST:\r
None.\r
\r
ACTIVELOCKSCREEN:\r
None.\r
\r
";

/// No requests in any section.
pub const IDLE_REPORT: &str = "\
DISPLAY:\r
None.\r
\r
SYSTEM:\r
None.\r
\r
AWAYMODE:\r
None.\r
\r
EXECUTION:\r
None.\r
\r
PERFBOOST:\r
None.\r
\r
ACTIVELOCKSCREEN:\r
None.\r
\r
";

/// A report carrying a section label newer than the known vocabulary.
pub const UNKNOWN_SECTION_REPORT: &str = "\
DISPLAY:\r
[SERVICE] \\Device\\HarddiskVolume3\\Windows\\System32\\svchost.exe (Audiosrv)\r
[PROCESS] C:\\Tools\\presenter.exe\r
Presentation mode\r
DISPLAYBOOST:\r
[PROCESS] C:\\Tools\\still-display.exe\r
\r
SYSTEM:\r
None.\r
";

/// What `powercfg /requests` prints when run without elevation.
pub const PERMISSION_DENIED_OUTPUT: &str = "\
This command requires administrator privileges and must be executed from an elevated command prompt.\r
";

impl MockRunner {
    /// Host with two display-blocking processes.
    pub fn typical() -> Self {
        Self::with_report(TYPICAL_REPORT)
    }

    /// Host with no outstanding requests.
    pub fn idle() -> Self {
        Self::with_report(IDLE_REPORT)
    }

    /// Host where every fetch is refused for lack of elevation.
    pub fn permission_denied() -> Self {
        let mut runner = Self::new();
        runner.set_permission_denied(PERMISSION_DENIED_OUTPUT.trim());
        runner
    }
}
