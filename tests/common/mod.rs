#![allow(dead_code)]

use chrono::prelude::*;

use simplelog::*;

use cgmath::Vector3;

use std::path::PathBuf;
use std::fs::{File, create_dir_all};
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Logs warnings to the terminal and everything down to debug level into a
/// timestamped log file below `test_output`. Safe to call from every test,
/// only the first call has an effect.
pub fn init_logging(test_name: &str) {
    INIT_LOGGING.call_once(|| {
        let mut path_buf = PathBuf::from("test_output");
        create_dir_all(&path_buf).expect("Test output directory could not be created");

        path_buf.push(format!("{}-{}", filename_timestamp(), test_name));
        path_buf.set_extension("log");
        let log_file = File::create(&path_buf).expect("Log file could not be created");

        CombinedLogger::init(
            vec![
                TermLogger::new(LevelFilter::Warn, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
                WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
            ]
        ).expect("Logger could not be initialized");

        info!("Initialized logging into {:?}", path_buf);
    });
}

/// Returns the current time formatted like "2014-11-28T120009+0000", i.e.
/// an ISO 8601 timestamp with the colons removed, since colons are traditionally
/// used as directory separators on mac and linux
fn filename_timestamp() -> String {
    Utc::now()
        .to_rfc3339()
        .replace(":", "")
}

pub fn down() -> Vector3<f32> {
    Vector3::new(0.0, 0.0, -1.0)
}

/// Unit squares at the given heights, two triangles each, facing up.
/// The square at `heights[k]` consists of faces `2k` and `2k + 1`.
pub fn stacked_squares(heights: &[f32]) -> (Vec<Vector3<f32>>, Vec<[usize; 3]>) {
    let mut positions = Vec::new();
    let mut faces = Vec::new();

    for &z in heights.iter() {
        let base = positions.len();
        positions.push(Vector3::new(0.0, 0.0, z));
        positions.push(Vector3::new(1.0, 0.0, z));
        positions.push(Vector3::new(1.0, 1.0, z));
        positions.push(Vector3::new(0.0, 1.0, z));
        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }

    (positions, faces)
}

/// Eight triangles facing up that all share the vertex at the origin and
/// together cover the square [-1, 1]^2 in the z=0 plane. The ring vertices
/// are exact, so every triangle reports the same `t` at the center.
pub fn fan() -> (Vec<Vector3<f32>>, Vec<[usize; 3]>) {
    let ring = [
        (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (-1.0, 1.0),
        (-1.0, 0.0), (-1.0, -1.0), (0.0, -1.0), (1.0, -1.0)
    ];

    let mut positions = vec![Vector3::new(0.0, 0.0, 0.0)];
    positions.extend(ring.iter().map(|&(x, y)| Vector3::new(x, y, 0.0)));

    let faces = (0..ring.len())
        .map(|i| [0, 1 + i, 1 + (i + 1) % ring.len()])
        .collect::<Vec<_>>();

    (positions, faces)
}
