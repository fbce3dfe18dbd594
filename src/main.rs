mod logger;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use nalgebra::{Point2, Vector2};

use draw_extrude::camera::OrthographicViewport;
use draw_extrude::mesh::{Face, Vertex};
use draw_extrude::projection::Viewport;
use draw_extrude::{
    DrawExtrude, EditContext, EditMesh, EventKind, ExtrudeSettings, HeadlessHost, InputEvent, MeshEditor,
    OperatorStatus, StepMode,
};

/// Replays a drawn pointer path over an OBJ mesh and writes the extruded result.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// mesh to extrude from
    input: PathBuf,

    /// where to write the extruded mesh
    output: PathBuf,

    /// comma separated vertex indices to start from
    #[arg(long, value_delimiter = ',')]
    select: Vec<usize>,

    /// start from every vertex of this face instead
    #[arg(long)]
    face: Option<usize>,

    /// pointer positions in pixels relative to the pivot, "x,y x,y ..."
    #[arg(long, default_value = "")]
    path: String,

    #[arg(long, value_enum, default_value_t = StepMode::Relative)]
    step_mode: StepMode,

    #[arg(long, default_value_t = 1.0)]
    absolute_step: f64,

    #[arg(long, default_value_t = 1.5)]
    relative_step: f64,

    /// world units per pixel of the top view
    #[arg(long, default_value_t = 0.01)]
    zoom: f64,
}

fn parse_path(path: &str) -> anyhow::Result<Vec<Vector2<f64>>> {
    path.split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| anyhow!("expected x,y but got {:?}", pair))?;
            Ok(Vector2::new(x.trim().parse::<f64>()?, y.trim().parse::<f64>()?))
        })
        .collect()
}

fn select_start(mesh: &mut EditMesh, args: &CliArgs) -> anyhow::Result<()> {
    mesh.deselect_all();
    for &index in &args.select {
        let vertex = Vertex::from(index);
        if mesh.position(vertex).is_none() {
            bail!("vertex {} does not exist", index);
        }
        mesh.select_vertex(vertex, true);
    }
    if let Some(index) = args.face {
        let face = Face::from(index);
        let corners = mesh
            .faces()
            .find(|&(f, _)| f == face)
            .map(|(_, corners)| corners.clone())
            .ok_or_else(|| anyhow!("face {} does not exist", index))?;
        for v in corners {
            mesh.select_vertex(v, true);
        }
        mesh.select_face(face, true);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logger::init_logger();
    let args = CliArgs::parse();

    let obj = obj::Obj::load(&args.input)
        .map_err(|err| anyhow!("failed to load {}: {:?}", args.input.display(), err))?;
    let mut mesh: EditMesh = obj.into();
    select_start(&mut mesh, &args)?;
    let path = parse_path(&args.path).context("bad --path")?;

    let settings = ExtrudeSettings {
        step_mode: args.step_mode,
        absolute_step: args.absolute_step,
        relative_step: args.relative_step,
    };
    let size = Vector2::new(1920.0, 1080.0);
    let mut host = HeadlessHost::new();
    let mut operator = DrawExtrude::new();

    // center the view on the selection so the pivot marker is on screen
    let center = draw_extrude::geometry::center_of(&mesh.selected_positions(), &mesh.world_transform())
        .unwrap_or_else(nalgebra::Point3::origin);
    let viewport = OrthographicViewport::top(center, args.zoom, size);
    let mut ctx = EditContext::new(&mut mesh, Some(&viewport), &mut host, &settings);

    if operator.invoke(&mut ctx) == OperatorStatus::Cancelled {
        bail!("draw-extrude did not start");
    }
    let start: Point2<f64> = viewport
        .project(&center)
        .ok_or_else(|| anyhow!("pivot is not visible"))?;

    let mut events = vec![InputEvent::press(EventKind::LeftMouse, start)];
    events.extend(path.iter().map(|offset| InputEvent::motion(start + offset)));
    let end = events.last().map_or(start, |e| e.pointer);
    events.push(InputEvent::release(EventKind::LeftMouse, end));
    events.push(InputEvent::key(EventKind::Escape));

    for event in &events {
        if operator.modal(&mut ctx, event) == OperatorStatus::Finished {
            break;
        }
    }

    let updates = ctx.mesh.revision();
    let out: obj::Obj = (&*ctx.mesh).into();
    out.save(&args.output)
        .map_err(|err| anyhow!("failed to save {}: {:?}", args.output.display(), err))?;
    log::info!(
        "wrote {} ({} vertices, {} faces, {} updates)",
        args.output.display(),
        ctx.mesh.vertex_count(),
        ctx.mesh.face_count(),
        updates
    );
    Ok(())
}
