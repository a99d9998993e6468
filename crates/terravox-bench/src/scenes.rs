use glam::{Mat4, Vec3};
use terravox_core::{Camera, Settings};
use terravox_render::DebugView;

/// Vertical field of view of every benchmark camera.
const FOV_Y_DEGREES: f32 = 60.0;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Animation time the frame is rendered at (drives the water).
    pub time: f32,
    /// Water level override; `None` keeps the loaded settings.
    pub water_height: Option<f32>,
    pub debug: Option<DebugView>,
}

impl SceneConfig {
    pub fn camera(&self, aspect: f32) -> Camera {
        let eye = Vec3::from(self.camera_position);
        let view = Mat4::look_at_rh(eye, Vec3::from(self.camera_target), Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, 0.05, 1000.0);
        Camera::new(proj * view, eye, self.time)
    }

    /// Settings for this scene derived from the loaded base settings.
    pub fn settings(&self, base: &Settings) -> Settings {
        let mut settings = base.clone();
        if let Some(h) = self.water_height {
            settings.max_water_height = settings.max_water_height.max(h);
            settings.water_height = h;
        }
        settings.visualize_distance_field = self.debug == Some(DebugView::DistanceField);
        settings.show_normals = self.debug == Some(DebugView::Normals);
        settings.show_steps = self.debug == Some(DebugView::Steps);
        settings
    }
}

/// Return the standard suite of benchmark scenes, from open vistas (mostly
/// sphere tracing) to grazing views along the ground (mostly voxel stepping).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "overview",
            camera_position: [0.0, 4.8, 0.0],
            camera_target: [40.0, -2.0, 30.0],
            time: 0.0,
            water_height: None,
            debug: None,
        },
        SceneConfig {
            name: "ground",
            camera_position: [12.0, 0.5, -6.0],
            camera_target: [40.0, -1.0, -6.0],
            time: 0.0,
            water_height: None,
            debug: None,
        },
        SceneConfig {
            name: "shoreline",
            camera_position: [0.0, -1.2, 0.0],
            camera_target: [25.0, -2.2, 12.0],
            time: 12.0,
            water_height: None,
            debug: None,
        },
        SceneConfig {
            name: "flooded",
            camera_position: [0.0, 3.0, 0.0],
            camera_target: [30.0, 0.0, 30.0],
            time: 30.0,
            water_height: Some(1.0),
            debug: None,
        },
        SceneConfig {
            name: "underwater",
            camera_position: [5.0, -3.5, 5.0],
            camera_target: [20.0, -2.0, 15.0],
            time: 5.0,
            water_height: None,
            debug: None,
        },
        SceneConfig {
            name: "step-count",
            camera_position: [0.0, 4.8, 0.0],
            camera_target: [40.0, -2.0, 30.0],
            time: 0.0,
            water_height: None,
            debug: Some(DebugView::Steps),
        },
    ]
}
