// Audio module - types shared with the tone playback subsystem
//
// Playback, calibration and device I/O live outside this crate; only the
// ear selector is needed to address per-ear audiograms.

pub mod ear;

pub use ear::Ear;
