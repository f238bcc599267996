use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

use crate::engine::error::EngineResult;
use crate::engine::mesh::Mesh;
use crate::engine::renderer::{Color, GpuMesh, Renderer};
use crate::engine::transform::TransformStack;
use crate::game::config::DisplayConfig;
use crate::game::world::World;

pub const RED: Color = (1.0, 0.0, 0.0);
pub const DARK_RED: Color = (0.8, 0.0, 0.0);
pub const BLUE: Color = (0.0, 0.0, 1.0);
pub const DARK_BLUE: Color = (0.0, 0.0, 0.5);
pub const GREEN: Color = (0.0, 0.5, 0.0);
pub const TREE_GREEN: Color = (0.0, 0.39, 0.0);
pub const ROAD_GRAY: Color = (0.2, 0.2, 0.2);
pub const SKY_BLUE: Color = (0.53, 0.81, 0.92);
pub const BROWN: Color = (0.55, 0.27, 0.07);
pub const BLACK: Color = (0.0, 0.0, 0.0);
pub const SKIN: Color = (0.96, 0.75, 0.6);

// Road surface sits just above the ground to avoid z-fighting.
const ROAD_LIFT: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    Ground,
    Road,
    CarBody,
    CarCabin,
    Wheel,
    PedestrianBody,
    PedestrianHead,
    PedestrianLeg,
    TreeTrunk,
    TreeCanopy,
    // Unit cube, scaled per obstacle.
    Block,
}

impl Part {
    pub const ALL: [Part; 11] = [
        Part::Ground,
        Part::Road,
        Part::CarBody,
        Part::CarCabin,
        Part::Wheel,
        Part::PedestrianBody,
        Part::PedestrianHead,
        Part::PedestrianLeg,
        Part::TreeTrunk,
        Part::TreeCanopy,
        Part::Block,
    ];

    pub fn mesh(self) -> Mesh {
        match self {
            Part::Ground => Mesh::plane(-25.0, 25.0, -500.0, 100.0),
            Part::Road => Mesh::plane(-5.0, 5.0, -500.0, 100.0),
            Part::CarBody => Mesh::cuboid(1.5, 1.0, 3.0),
            Part::CarCabin => Mesh::cuboid(1.3, 0.7, 1.5),
            Part::Wheel => Mesh::cylinder(0.4, 0.3, 16),
            Part::PedestrianBody => Mesh::cuboid(0.6, 1.0, 0.3),
            Part::PedestrianHead => Mesh::sphere(0.3, 16, 16),
            Part::PedestrianLeg => Mesh::cuboid(0.2, 0.6, 0.2),
            Part::TreeTrunk => Mesh::cylinder(0.2, 2.0, 8),
            Part::TreeCanopy => Mesh::cone(1.0, 2.0, 8),
            Part::Block => Mesh::cuboid(1.0, 1.0, 1.0),
        }
    }
}

pub trait PartSink {
    fn draw_part(&mut self, part: Part, model: &Matrix4<f32>, color: Color);
}

pub fn draw_ground(stack: &mut TransformStack, sink: &mut dyn PartSink, scroll: f32) {
    {
        let mut scope = stack.push();
        scope.translate(0.0, 0.0, scroll);
        sink.draw_part(Part::Ground, scope.top(), GREEN);
    }
    let mut scope = stack.push();
    scope.translate(0.0, ROAD_LIFT, scroll);
    sink.draw_part(Part::Road, scope.top(), ROAD_GRAY);
}

const WHEEL_POSITIONS: [(f32, f32); 4] = [(-0.8, -1.0), (0.8, -1.0), (-0.8, 1.0), (0.8, 1.0)];

pub fn draw_car(stack: &mut TransformStack, sink: &mut dyn PartSink, x: f32, y: f32, z: f32) {
    let mut car = stack.push();
    car.translate(x, y, z);
    {
        let mut body = car.push();
        body.translate(0.0, 0.5, 0.0);
        sink.draw_part(Part::CarBody, body.top(), RED);
    }
    {
        let mut cabin = car.push();
        cabin.translate(0.0, 1.1, -0.2);
        sink.draw_part(Part::CarCabin, cabin.top(), DARK_RED);
    }
    for (wx, wz) in WHEEL_POSITIONS {
        let mut wheel = car.push();
        wheel.translate(wx, 0.0, wz);
        wheel.rotate(90.0, Vector3::y_axis());
        sink.draw_part(Part::Wheel, wheel.top(), BLACK);
    }
}

pub fn draw_pedestrian(stack: &mut TransformStack, sink: &mut dyn PartSink, x: f32, y: f32, z: f32) {
    let mut figure = stack.push();
    figure.translate(x, y, z);
    {
        let mut body = figure.push();
        body.translate(0.0, 0.5, 0.0);
        sink.draw_part(Part::PedestrianBody, body.top(), BLUE);
    }
    {
        let mut head = figure.push();
        head.translate(0.0, 1.2, 0.0);
        sink.draw_part(Part::PedestrianHead, head.top(), SKIN);
    }
    for lx in [-0.2, 0.2] {
        let mut leg = figure.push();
        leg.translate(lx, -0.05, 0.0);
        sink.draw_part(Part::PedestrianLeg, leg.top(), DARK_BLUE);
    }
}

pub fn draw_tree(stack: &mut TransformStack, sink: &mut dyn PartSink, x: f32, y: f32, z: f32) {
    let mut tree = stack.push();
    tree.translate(x, y, z);
    {
        let mut trunk = tree.push();
        trunk.translate(0.0, 1.0, 0.0);
        trunk.rotate(90.0, Vector3::x_axis());
        sink.draw_part(Part::TreeTrunk, trunk.top(), BROWN);
    }
    let mut canopy = tree.push();
    canopy.translate(0.0, 2.5, 0.0);
    canopy.rotate(-90.0, Vector3::x_axis());
    sink.draw_part(Part::TreeCanopy, canopy.top(), TREE_GREEN);
}

pub fn draw_obstacle(stack: &mut TransformStack, sink: &mut dyn PartSink, x: f32, y: f32, z: f32, size: f32) {
    let mut block = stack.push();
    block.translate(x, y, z);
    block.scale(size, size, size);
    sink.draw_part(Part::Block, block.top(), BROWN);
}

pub fn draw_world(world: &World, sink: &mut dyn PartSink) {
    let mut stack = TransformStack::new();
    draw_ground(&mut stack, sink, world.scroll);
    for tree in &world.trees {
        draw_tree(&mut stack, sink, tree.x, tree.y, tree.z);
    }
    for obstacle in &world.obstacles {
        draw_obstacle(&mut stack, sink, obstacle.x, obstacle.y, obstacle.z, obstacle.size);
    }
    let pedestrian = &world.pedestrian;
    draw_pedestrian(&mut stack, sink, pedestrian.x, pedestrian.y, pedestrian.z);
    draw_car(&mut stack, sink, world.car.x, 0.0, world.tuning().car_depth);
}

pub fn camera(world: &World) -> (Point3<f32>, Point3<f32>) {
    let x = if world.is_game_over() { 0.0 } else { world.car.x * 0.3 };
    (Point3::new(x, 3.0, 15.0), Point3::new(x, 0.0, 0.0))
}

pub fn view_projection(world: &World, display: &DisplayConfig) -> Matrix4<f32> {
    let aspect = display.width as f32 / display.height as f32;
    let projection = Perspective3::new(aspect, display.fov_degrees.to_radians(), 0.1, 100.0).to_homogeneous();
    let (eye, target) = camera(world);
    let view = Matrix4::look_at_rh(&eye, &target, &Vector3::y());
    projection * view
}

pub struct MeshLibrary {
    meshes: Vec<GpuMesh>,
}

impl MeshLibrary {
    pub fn upload(renderer: &Renderer) -> EngineResult<Self> {
        let meshes = Part::ALL
            .iter()
            .map(|part| renderer.upload(&part.mesh()))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(MeshLibrary { meshes })
    }

    pub fn get(&self, part: Part) -> &GpuMesh {
        &self.meshes[part as usize]
    }
}

pub struct RendererSink<'a> {
    pub renderer: &'a Renderer,
    pub meshes: &'a MeshLibrary,
    pub view_projection: Matrix4<f32>,
}

impl PartSink for RendererSink<'_> {
    fn draw_part(&mut self, part: Part, model: &Matrix4<f32>, color: Color) {
        self.renderer.draw_mesh(self.meshes.get(part), model, color, &self.view_projection);
    }
}
