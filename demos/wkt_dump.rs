//! Print the polyhedral surface of every cell, one per line
//!
//! Reads whitespace-separated `x y z` triples from the file given as the
//! first argument, or uses a small jittered lattice when none is given. The
//! optional second argument sets the container ratio.
//!
//! ```text
//! cargo run --example wkt_dump -- points.txt 1.5
//! ```

use rust_voronoi_cells::generation::jittered_lattice;
use rust_voronoi_cells::*;

fn read_points(path: &str) -> std::result::Result<Vec<DVec3>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let values = text
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if values.len() % 3 != 0 {
        return Err(format!("{} values is not a whole number of points", values.len()).into());
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| DVec3::new(c[0], c[1], c[2]))
        .collect())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let points = match args.next() {
        Some(path) => read_points(&path)?,
        None => jittered_lattice([3, 3, 3], 1.0, 0.2, 7),
    };
    let ratio = match args.next() {
        Some(value) => value.parse::<f64>()?,
        None => 1.0,
    };

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let zs: Vec<f64> = points.iter().map(|p| p.z).collect();

    for surface in compute_diagram(&xs, &ys, &zs, ratio)? {
        println!("{}", surface.as_deref().unwrap_or("NA"));
    }
    Ok(())
}
