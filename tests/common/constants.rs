//! Shared constants for end-to-end tests
//!
//! When fixture data changes, update only this file.

// ============================================================================
// Test Gear IDs
// ============================================================================

/// Song the reference tones belong to
pub const SONG_1_ID: &str = "song-1";

/// Reference Les Paul with a three-way selector (Rhythm, Middle, Treble)
pub const LES_PAUL_ID: &str = "lp-standard";

/// Target guitar known only by its "HH" layout code
pub const SG_ID: &str = "sg-special";

/// Reference Fender amp with Volume, Treble and Bass controls
pub const TWIN_ID: &str = "twin-reverb";

/// Target Marshall amp with Gain, Bass, Middle, Treble and Presence controls
pub const JCM800_ID: &str = "jcm800";

/// Solid state practice amp without any recorded controls
pub const PRACTICE_AMP_ID: &str = "practice-10";

/// Bridge humbucker lead tone with an explicit voice and no reference gear
pub const TONE_SOLO_ID: &str = "tone-solo";

/// Rhythm tone recorded on the Les Paul through the Twin
pub const TONE_RHYTHM_ID: &str = "tone-rhythm";

/// Declared confidence of the solo tone
pub const TONE_SOLO_CONFIDENCE: u8 = 80;

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
