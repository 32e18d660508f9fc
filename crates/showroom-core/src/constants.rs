// Presentation tuning constants shared by the core controller and the web frontend.

// Idle float motion
pub const FLOAT_AMPLITUDE: f32 = 0.2; // world units of vertical bob
pub const FLOAT_SPEED: f32 = 1.5; // multiplier on seconds-scale time

// Drag interaction
pub const DRAG_ROTATE_SENSITIVITY: f32 = 0.005; // radians per screen pixel

// Scroll choreography
pub const SCROLL_ROTATION_RANGE: f32 = std::f32::consts::PI * 4.0; // pitch swept over the full page
pub const SCROLL_PITCH_OFFSET: f32 = 0.5; // baseline pitch added to the scroll sweep
pub const SCROLL_SUPPRESS_THRESHOLD: f32 = 5.0; // scroll delta that pauses autorotation (strict >)

// Autorotation
pub const AUTOROTATE_STEP: f32 = 0.003; // yaw radians per frame while autorotating
pub const AUTOROTATE_RESUME_DELAY_MS: f64 = 2000.0; // quiet period before autorotation resumes

// Load-in presentation
pub const INITIAL_YAW: f32 = 0.5; // resting yaw applied when the model binds
pub const ENTRANCE_DURATION_MS: f64 = 1000.0; // zero-to-unit scale tween length

// Camera framing
pub const CAMERA_DISTANCE_FACTOR: f32 = 1.75; // eye distance per unit of largest model extent
pub const CAMERA_HEIGHT: f32 = 1.0; // eye height above the model origin
pub const CAMERA_FOVY_RADIANS: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Showroom material defaults applied to every mesh on load (ivory, matte)
pub const DEFAULT_MESH_COLOR: [f32; 3] = [1.0, 1.0, 240.0 / 255.0];
pub const DEFAULT_METALNESS: f32 = 0.4;
pub const DEFAULT_ROUGHNESS: f32 = 1.0;

// AR reticle ring (flat on the detected surface)
pub const RETICLE_INNER_RADIUS: f32 = 0.1;
pub const RETICLE_OUTER_RADIUS: f32 = 0.15;
pub const RETICLE_SEGMENTS: u32 = 32;
