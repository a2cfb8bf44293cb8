//! Photographic parameter model for the depth-of-field pipeline.
//!
//! Aperture and focal length are derived quantities: the user picks a
//! vertical field of view and an f-stop, the model computes the rest. All
//! lengths are in units of the sensor height, matching the camera math in
//! the render crates.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Third-stop aperture series exposed by the parameter panel.
pub const F_STOPS: [f32; 17] = [
    0.7, 0.8, 1.0, 1.2, 1.4, 1.7, 2.0, 2.4, 2.8, 3.3, 4.0, 4.8, 5.6, 6.7, 8.0, 9.5, 11.0,
];

pub const FOCAL_PLANE_RANGE: RangeInclusive<f32> = 0.1..=100.0;
pub const FOV_RANGE: RangeInclusive<f32> = 5.0..=90.0;
pub const MAX_COC_RADIUS_RANGE: RangeInclusive<i32> = 1..=20;
pub const FAR_RESCALE_RANGE: RangeInclusive<f32> = 0.1..=20.0;

/// Focal length for a vertical field of view, with the sensor height
/// normalized to 1.
pub fn focal_length_for_fov(fov_deg: f32) -> f32 {
    1.0 / (2.0 * (fov_deg.to_radians() * 0.5).tan())
}

/// Debug visualization selected in the composite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugMode {
    Off,
    ShowCoc,
    ShowRegion,
    ShowNear,
    ShowBlurry,
    ShowInput,
    ShowMidAndFar,
    ShowSignedCoc,
}

impl DebugMode {
    pub const ALL: [DebugMode; 8] = [
        DebugMode::Off,
        DebugMode::ShowCoc,
        DebugMode::ShowRegion,
        DebugMode::ShowNear,
        DebugMode::ShowBlurry,
        DebugMode::ShowInput,
        DebugMode::ShowMidAndFar,
        DebugMode::ShowSignedCoc,
    ];

    /// Integer sent to the composite shader.
    pub fn index(self) -> i32 {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0) as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            DebugMode::Off => "Off",
            DebugMode::ShowCoc => "Show CoC",
            DebugMode::ShowRegion => "Show Region",
            DebugMode::ShowNear => "Show Near",
            DebugMode::ShowBlurry => "Show Blurry",
            DebugMode::ShowInput => "Show Input",
            DebugMode::ShowMidAndFar => "Show Mid & Far",
            DebugMode::ShowSignedCoc => "Show Signed CoC",
        }
    }
}

/// Errors from preset persistence.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunable depth-of-field parameters.
///
/// `aperture` and `focal_length` are derived; call [`DofParams::update`]
/// after editing the primary fields (the panel does this once per frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofParams {
    /// Distance to the plane in perfect focus.
    pub focal_plane: f32,
    /// Index into [`F_STOPS`].
    pub f_stop_index: usize,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Largest circle of confusion the blur pass will spread, in pixels.
    pub max_coc_radius_px: i32,
    /// Rescale applied to far-field blur in the composite pass.
    pub far_radius_rescale: f32,
    /// Composite-pass debug visualization.
    pub debug_mode: DebugMode,
    /// Derived: focal_length / f_stop.
    #[serde(skip)]
    pub aperture: f32,
    /// Derived from `fov_deg`.
    #[serde(skip)]
    pub focal_length: f32,
}

impl Default for DofParams {
    fn default() -> Self {
        let mut params = Self {
            focal_plane: 10.0,
            f_stop_index: 8, // f/2.8
            fov_deg: 25.0,
            max_coc_radius_px: 8,
            far_radius_rescale: 1.0,
            debug_mode: DebugMode::Off,
            aperture: 0.0,
            focal_length: 0.0,
        };
        params.update();
        params
    }
}

impl DofParams {
    /// Currently selected f-number.
    pub fn f_stop(&self) -> f32 {
        F_STOPS[self.f_stop_index.min(F_STOPS.len() - 1)]
    }

    /// Recompute derived values and clamp the primary fields into range.
    /// The focal plane can never move closer than the focal length.
    pub fn update(&mut self) {
        self.fov_deg = self
            .fov_deg
            .clamp(*FOV_RANGE.start(), *FOV_RANGE.end());
        self.f_stop_index = self.f_stop_index.min(F_STOPS.len() - 1);
        self.max_coc_radius_px = self
            .max_coc_radius_px
            .clamp(*MAX_COC_RADIUS_RANGE.start(), *MAX_COC_RADIUS_RANGE.end());
        self.far_radius_rescale = self
            .far_radius_rescale
            .clamp(*FAR_RESCALE_RANGE.start(), *FAR_RESCALE_RANGE.end());

        self.focal_length = focal_length_for_fov(self.fov_deg);
        self.aperture = self.focal_length / self.f_stop();
        self.focal_plane = self
            .focal_plane
            .clamp(*FOCAL_PLANE_RANGE.start(), *FOCAL_PLANE_RANGE.end())
            .max(self.focal_length);
    }

    /// Save the preset as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        tracing::info!(path = %path.as_ref().display(), "preset saved");
        Ok(())
    }

    /// Load a preset and recompute the derived fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut params: Self = serde_json::from_reader(file)?;
        params.update();
        tracing::info!(path = %path.as_ref().display(), "preset loaded");
        Ok(params)
    }
}

pub fn crate_info() -> &'static str {
    "defocus-optics v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_stop_table_is_increasing() {
        for pair in F_STOPS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn focal_length_at_90_degrees() {
        assert!((focal_length_for_fov(90.0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn narrow_fov_means_longer_lens() {
        assert!(focal_length_for_fov(25.0) > focal_length_for_fov(60.0));
    }

    #[test]
    fn defaults_are_derived() {
        let p = DofParams::default();
        assert!((p.f_stop() - 2.8).abs() < 1e-6);
        assert!(p.focal_length > 0.0);
        assert!((p.aperture - p.focal_length / 2.8).abs() < 1e-6);
    }

    #[test]
    fn wider_stop_opens_the_aperture() {
        let mut open = DofParams::default();
        open.f_stop_index = 0; // f/0.7
        open.update();
        let mut closed = DofParams::default();
        closed.f_stop_index = 16; // f/11
        closed.update();
        assert!(open.aperture > closed.aperture);
    }

    #[test]
    fn focal_plane_cannot_cross_the_lens() {
        let mut p = DofParams::default();
        p.fov_deg = 5.0; // focal length well above the panel minimum
        p.focal_plane = 0.1;
        p.update();
        assert!(p.focal_plane >= p.focal_length);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut p = DofParams::default();
        p.fov_deg = 500.0;
        p.max_coc_radius_px = 99;
        p.far_radius_rescale = 0.0;
        p.f_stop_index = 1000;
        p.update();
        assert_eq!(p.fov_deg, 90.0);
        assert_eq!(p.max_coc_radius_px, 20);
        assert_eq!(p.far_radius_rescale, 0.1);
        assert_eq!(p.f_stop_index, F_STOPS.len() - 1);
    }

    #[test]
    fn debug_mode_indices_are_stable() {
        assert_eq!(DebugMode::Off.index(), 0);
        assert_eq!(DebugMode::ShowSignedCoc.index(), 7);
        for (i, mode) in DebugMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i as i32);
        }
    }

    #[test]
    fn preset_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut p = DofParams::default();
        p.focal_plane = 17.5;
        p.f_stop_index = 3;
        p.debug_mode = DebugMode::ShowRegion;
        p.update();
        p.save(tmp.path()).unwrap();

        let loaded = DofParams::load(tmp.path()).unwrap();
        assert_eq!(loaded, p);
        // Derived fields come back from update(), not from the file.
        assert!((loaded.aperture - p.aperture).abs() < 1e-6);
    }

    #[test]
    fn load_rejects_garbage() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), b"not json").unwrap();
        assert!(matches!(
            DofParams::load(tmp.path()),
            Err(PresetError::Json(_))
        ));
    }
}
