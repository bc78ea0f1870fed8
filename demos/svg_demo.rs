//! Render a random Voronoi diagram as an SVG document on stdout
//!
//! Run with `cargo run --example svg_demo > voronoi.svg`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_planar_voronoi::*;

fn main() -> Result<()> {
    let bounds = Bounds::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let points: Vec<DVec2> = (0..200)
        .map(|_| {
            DVec2::new(
                rng.gen_range(bounds.xmin..bounds.xmax),
                rng.gen_range(bounds.ymin..bounds.ymax),
            )
        })
        .collect();

    let delaunay = Delaunay::new(points)?;
    eprintln!(
        "{} sites, {} triangles, {} on the hull",
        delaunay.len(),
        delaunay.triangle_count(),
        delaunay.hull().len()
    );

    let mut mesh = SvgPath::new();
    delaunay.render(&mut mesh);

    let mut sites = SvgPath::new();
    delaunay.render_points(&mut sites, 2.0)?;

    let voronoi = delaunay.voronoi(bounds)?;
    let mut edges = SvgPath::new();
    voronoi.render(&mut edges);
    voronoi.render_bounds(&mut edges);

    let cells = voronoi.cells();
    let total: f64 = cells.iter().map(|cell| cell.area()).sum();
    eprintln!("cell area {:.1} of {:.1}", total, bounds.area());

    // the cell at the middle of the canvas and its closest neighbor
    let middle = bounds.center();
    if let Some(cell) = cells.iter().find(|cell| voronoi.contains(cell.id, middle.x, middle.y)) {
        let closest = cell
            .neighbors
            .iter()
            .filter_map(|&j| cells.iter().find(|other| other.id == j))
            .min_by(|a, b| cell.distance_to(a).total_cmp(&cell.distance_to(b)));
        eprintln!(
            "middle cell {}: {} neighbors, {} vertices, centroid ({:.1}, {:.1})",
            cell.id,
            cell.neighbor_count(),
            cell.vertex_count(),
            cell.centroid().x,
            cell.centroid().y
        );
        if let Some(other) = closest {
            eprintln!(
                "  closest neighbor {} at {:.1}, adjacent both ways: {}",
                other.id,
                cell.distance_to(other),
                other.is_neighbor_of(cell.id)
            );
        }
    }

    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        bounds.xmin,
        bounds.ymin,
        bounds.width(),
        bounds.height()
    );
    println!(
        r##"<path d="{}" fill="none" stroke="#ccc"/>"##,
        mesh.value().unwrap_or_default()
    );
    println!(
        r##"<path d="{}" fill="none" stroke="#000"/>"##,
        edges.value().unwrap_or_default()
    );
    println!(r##"<path d="{}" fill="#c00"/>"##, sites.value().unwrap_or_default());
    println!("</svg>");
    Ok(())
}
