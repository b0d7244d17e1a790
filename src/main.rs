//! Point cloud player CLI - Play an animation headlessly and report batch stats.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use glam::DVec3;
use point_cloud_player::{
    animation::AnimationPlayer,
    geometry::LoadPolicy,
    render::{CameraPose, PointCloudRenderer, Projection},
    schema::{PointSet, ViewerConfig},
    view::{ViewFramer, bounds_center},
};

/// Simulated display refresh rate.
const TICK_RATE: f64 = 60.0;

/// Camera orbit speed in radians per second.
const ORBIT_SPEED: f64 = 0.5;

/// Camera elevation above the orbit plane in radians.
const ORBIT_PITCH: f64 = 0.3;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <file-or-dir> [config.json]", args[0]);
        eprintln!();
        eprintln!("Play a point cloud animation once through without a window.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  file-or-dir  A .obj vertex file, or a directory of them (one per frame)");
        eprintln!("  config.json  Viewer configuration (default: built-in settings)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(path) => ViewerConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => ViewerConfig::default(),
    };

    let renderer = PointCloudRenderer::new(&config.render);
    let mut player = AnimationPlayer::new(renderer, &config.playback);

    let start = Instant::now();
    let report = player.load(&input, LoadPolicy::Degrade).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", input.display(), e);
        std::process::exit(1);
    });
    let load_time = start.elapsed();

    let frames = player.frames();
    println!("Point Cloud Player");
    println!("==================");
    println!("Input: {}", input.display());
    println!("Frames: {}", frames.len());
    println!("Points: {}", frames.total_points());
    println!(
        "Colors: {}",
        if frames.has_color_data() {
            "per point"
        } else {
            "uniform"
        }
    );
    println!("Skipped records: {}", report.warning_count());
    println!("Failed frames: {}", report.failed_frames());
    println!("Load time: {:.2}s", load_time.as_secs_f32());
    println!();

    let target = frames
        .get(0)
        .and_then(|f| bounds_center(f))
        .unwrap_or_default();
    let distance = frames
        .get(0)
        .and_then(|f| f.bounds())
        .map_or(10.0, |b| (b.size().length() * 1.5).max(1.0));

    let projection = Projection::default();
    let mut rig = OrbitRig::new(target, distance);
    let mut framer = ViewFramer::new(&config.framer, rig.pose());

    // One pass through the frames, however the config sets looping.
    player.set_loop(false);
    player.play();

    let delta = 1.0 / TICK_RATE;
    let mut ticks: u64 = 0;
    let mut camera_rebuilds: u64 = 0;
    let mut resets: u64 = 0;
    let mut max_batches = 0;
    let mut max_vertices = 0;
    let empty = PointSet::empty();

    println!("Playing at {:.1} fps...", player.frame_rate());
    let start = Instant::now();

    while player.is_playing() {
        player.tick(delta);
        ticks += 1;

        let was_resetting = framer.is_resetting();
        let points = player.current_frame().map_or(&empty, |f| &**f);
        let camera = rig.step(delta, &mut framer, &projection, points);
        if framer.is_resetting() && !was_resetting {
            resets += 1;
        }

        if player.sink_mut().update_camera(&camera) {
            camera_rebuilds += 1;
        }

        let renderer = player.sink();
        max_batches = max_batches.max(renderer.batches().len());
        max_vertices = max_vertices.max(renderer.total_vertices());
    }

    let elapsed = start.elapsed();
    let renderer = player.sink();

    println!();
    println!(
        "Playback finished on frame {}/{}",
        player.current_frame_index() + 1,
        player.total_frames()
    );
    println!("  Ticks: {} ({:.1}s simulated)", ticks, ticks as f64 * delta);
    println!(
        "  Batch rebuilds: {} ({} from camera motion)",
        renderer.rebuild_count(),
        camera_rebuilds
    );
    println!("  Peak batches per frame: {}", max_batches);
    println!("  Peak vertices per frame: {}", max_vertices);
    println!("  Camera resets: {}", resets);
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
}

/// Orbiting camera that yields to the framer while a reset is running.
struct OrbitRig {
    target: DVec3,
    distance: f64,
    yaw: f64,
    pose: CameraPose,
}

impl OrbitRig {
    fn new(target: DVec3, distance: f64) -> Self {
        Self {
            target,
            distance,
            yaw: 0.0,
            pose: CameraPose::orbit(target, 0.0, ORBIT_PITCH, distance),
        }
    }

    fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Advance one tick and return the pose to render with.
    fn step(
        &mut self,
        delta: f64,
        framer: &mut ViewFramer,
        projection: &Projection,
        points: &PointSet,
    ) -> CameraPose {
        if !framer.is_resetting() {
            self.yaw += delta * ORBIT_SPEED;
            self.pose = CameraPose::orbit(self.target, self.yaw, ORBIT_PITCH, self.distance);
        }
        if let Some(pose) = framer.update(delta, &self.pose, projection, points) {
            self.pose = pose;
            if !framer.is_resetting() {
                // Back at the default pose, which is the start of the orbit.
                self.yaw = 0.0;
            }
        }
        self.pose
    }
}

fn print_example_config() {
    let config = ViewerConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
