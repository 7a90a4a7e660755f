//! Example: Decompose a random point cloud into Voronoi cells
//!
//! Demonstrates the basic usage of the diagram pipeline.

use rust_voronoi_cells::generation::random_points_in_box;
use rust_voronoi_cells::*;

fn main() -> Result<()> {
    println!("Voronoi Cell Decomposition Example");
    println!("==================================\n");

    let config = DiagramConfigBuilder::new()
        .container_ratio(1.2)?
        .build()?;

    println!("Configuration:");
    println!("  Container ratio: {}", config.container_ratio);
    println!("  Threshold floor: {}", config.threshold_floor);
    println!("  Block volume: {}", config.block_volume);
    println!("  Parallel: {}", config.parallel);
    println!();

    let bounds = BoundingBox::new(DVec3::ZERO, DVec3::new(20.0, 10.0, 5.0));
    let points = random_points_in_box(2000, &bounds, 42);

    println!("Decomposing {} points...", points.len());
    let diagram = VoronoiDiagram::compute(&points, config)?;
    let container = diagram.container();
    println!(
        "  Container: {:?} .. {:?} ({} x {} x {} buckets)\n",
        container.bounds().min,
        container.bounds().max,
        container.dims().nx,
        container.dims().ny,
        container.dims().nz
    );

    let computed: Vec<&Cell> = diagram.computed_cells().collect();
    let total_faces: usize = computed.iter().map(|c| c.face_count()).sum();
    let total_vertices: usize = computed.iter().map(|c| c.vertex_count()).sum();

    println!("Statistics:");
    println!("  Cells computed: {}", computed.len());
    println!("  Cells failed: {}", diagram.failures().len());
    println!("  Average faces per cell: {:.2}", total_faces as f64 / computed.len() as f64);
    println!("  Average vertices per cell: {:.2}", total_vertices as f64 / computed.len() as f64);
    println!(
        "  Volume: {:.6} (container {:.6})",
        diagram.total_volume(),
        container.bounds().volume()
    );
    println!();

    println!("Sample cells:");
    for cell in computed.iter().take(5) {
        let g = cell.generator();
        println!(
            "  Cell {}: generator=({:.2}, {:.2}, {:.2}), faces={}, neighbors={}, walls={}, \
             volume={:.4}",
            cell.id(),
            g.x,
            g.y,
            g.z,
            cell.face_count(),
            cell.neighbor_ids().len(),
            cell.walls().len(),
            cell.volume()
        );
    }

    #[cfg(feature = "spatial-index")]
    {
        let position = DVec3::new(10.0, 5.0, 2.5);
        if let Some(id) = diagram.find_cell_at(position) {
            println!("\nPosition {:?} lies in cell {}", position, id);
        }
    }

    Ok(())
}
